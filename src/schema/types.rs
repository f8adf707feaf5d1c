// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use std::sync::Arc;

use crate::basic::{LogicalType, Repetition, Type as PhysicalType};
use crate::errors::Result;

// ----------------------------------------------------------------------
// Parquet Type definitions

pub type TypePtr = Arc<Type>;
pub type SchemaDescPtr = Arc<SchemaDescriptor>;
pub type ColumnDescPtr = Arc<ColumnDescriptor>;

/// Representation of a Parquet type. Note that the top-level schema type
/// is represented using `GroupType` whose repetition is `None`.
#[derive(Debug, PartialEq)]
pub enum Type {
  PrimitiveType {
    basic_info: BasicTypeInfo, physical_type: PhysicalType,
    type_length: i32, scale: i32, precision: i32
  },
  GroupType {
    basic_info: BasicTypeInfo, fields: Vec<TypePtr>
  }
}

impl Type {
  // Create a new `PrimitiveType` instance from the input parameters.
  // This also checks various illegal conditions and returns `Err` in case
  // that happens.
  pub fn new_primitive_type(
    name: &str, repetition: Repetition,
    physical_type: PhysicalType, logical_type: LogicalType, length: i32,
    precision: i32, scale: i32, id: Option<i32>) -> Result<Type> {

    let basic_info = BasicTypeInfo {
      name: String::from(name), repetition: Some(repetition),
      logical_type: logical_type, id: id };

    match logical_type {
      LogicalType::NONE => {
      },
      LogicalType::UTF8 | LogicalType::BSON | LogicalType::JSON => {
        if physical_type != PhysicalType::BYTE_ARRAY {
          return Err(invalid_err!(
            "{} can only annotate BYTE_ARRAY fields", logical_type))
        }
      },
      LogicalType::DECIMAL => {
        match physical_type {
          PhysicalType::INT32 | PhysicalType::INT64 | PhysicalType::BYTE_ARRAY |
          PhysicalType::FIXED_LEN_BYTE_ARRAY => (),
          _ => {
            return Err(invalid_err!(
              "DECIMAL can only annotate INT32, INT64, BYTE_ARRAY and FIXED"))
          }
        };
        if precision < 0 {
          return Err(invalid_err!("Invalid DECIMAL precision: {}", precision))
        }
        if scale < 0 {
          return Err(invalid_err!("Invalid DECIMAL scale: {}", scale))
        }
        if scale > precision {
          return Err(invalid_err!(
            "Invalid DECIMAL: scale ({}) cannot be greater than precision ({})",
            scale, precision))
        }
      }
      LogicalType::DATE | LogicalType::TIME_MILLIS | LogicalType::UINT_8 |
      LogicalType::UINT_16 | LogicalType::UINT_32 |
      LogicalType::INT_8 | LogicalType::INT_16 | LogicalType::INT_32 => {
        if physical_type != PhysicalType::INT32 {
          return Err(invalid_err!("{} can only annotate INT32", logical_type))
        }
      }
      LogicalType::TIME_MICROS | LogicalType::TIMESTAMP_MILLIS |
      LogicalType::TIMESTAMP_MICROS | LogicalType::UINT_64 | LogicalType::INT_64 => {
        if physical_type != PhysicalType::INT64 {
          return Err(invalid_err!("{} can only annotate INT64", logical_type))
        }
      }
      LogicalType::INTERVAL => {
        if physical_type != PhysicalType::FIXED_LEN_BYTE_ARRAY || length != 12 {
          return Err(invalid_err!("INTERVAL can only annotate FIXED(12)"))
        }
      }
      LogicalType::ENUM => {
        if physical_type != PhysicalType::BYTE_ARRAY {
          return Err(invalid_err!("ENUM can only annotate BYTE_ARRAY fields"))
        }
      }
      _ => {
        return Err(invalid_err!(
          "{} cannot be applied to a primitive type", logical_type))
      }
    };
    if physical_type == PhysicalType::FIXED_LEN_BYTE_ARRAY && length < 0 {
      return Err(invalid_err!("Invalid FIXED_LEN_BYTE_ARRAY length: {}", length))
    }
    Ok(Type::PrimitiveType {
      basic_info: basic_info,
      physical_type: physical_type,
      type_length: length,
      scale: scale,
      precision: precision
    })
  }

  // Create a new `GroupType` instance from the input parameters.
  pub fn new_group_type(
    name: &str, repetition: Option<Repetition>,
    logical_type: LogicalType, fields: Vec<TypePtr>, id: Option<i32>) -> Result<Type> {

    let basic_info = BasicTypeInfo {
      name: String::from(name), repetition: repetition,
      logical_type: logical_type, id: id };
    Ok(Type::GroupType { basic_info: basic_info, fields: fields })
  }

  pub fn get_basic_info(&self) -> &BasicTypeInfo {
    match *self {
      Type::PrimitiveType { ref basic_info, .. } => &basic_info,
      Type::GroupType { ref basic_info, .. } => &basic_info
    }
  }

  pub fn name(&self) -> &str {
    self.get_basic_info().name()
  }

  /// Get the fields from this group type.
  /// NOTE: this will panic if called on a non-group type.
  pub fn get_fields(&self) -> &[TypePtr] {
    match *self {
      Type::GroupType { ref fields, .. } => &fields[..],
      _ => panic!("Cannot call get_fields() on a non-group type")
    }
  }

  pub fn is_primitive(&self) -> bool {
    match *self {
      Type::PrimitiveType { .. } => true,
      _ => false
    }
  }

  pub fn is_group(&self) -> bool {
    match *self {
      Type::GroupType { .. } => true,
      _ => false
    }
  }

  /// Whether this is the top-level schema type (message type).
  pub fn is_schema(&self) -> bool {
    match *self {
      Type::GroupType { ref basic_info, .. } => !basic_info.has_repetition(),
      _ => false
    }
  }
}

/// Basic type info. This contains information such as the name of the type,
/// the repetition level, the logical type and the kind of the type (group,
/// primitive).
#[derive(Debug, PartialEq)]
pub struct BasicTypeInfo {
  name: String,
  repetition: Option<Repetition>,
  logical_type: LogicalType,
  id: Option<i32>,
}

impl BasicTypeInfo {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn has_repetition(&self) -> bool {
    self.repetition.is_some()
  }

  pub fn repetition(&self) -> Repetition {
    assert!(self.repetition.is_some());
    self.repetition.unwrap()
  }

  pub fn logical_type(&self) -> LogicalType {
    self.logical_type
  }

  pub fn has_id(&self) -> bool {
    self.id.is_some()
  }

  pub fn id(&self) -> i32 {
    assert!(self.id.is_some());
    self.id.unwrap()
  }
}

// ----------------------------------------------------------------------
// Parquet descriptor definitions

/// Represents a path in a nested schema
#[derive(Clone, PartialEq, Debug)]
pub struct ColumnPath {
  parts: Vec<String>
}

impl ColumnPath {
  pub fn new(parts: Vec<String>) -> Self {
    ColumnPath { parts: parts }
  }

  pub fn string(&self) -> String {
    self.parts.join(".")
  }
}

impl fmt::Display for ColumnPath {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.string())
  }
}

/// A descriptor for leaf-level primitive columns. This encapsulates
/// information such as definition and repetition levels and is used to
/// re-assemble nested data.
pub struct ColumnDescriptor {
  // The "leaf" primitive type of this column
  primitive_type: TypePtr,

  // The maximum definition level for this column
  max_def_level: i16,

  // The maximum repetition level for this column
  max_rep_level: i16,

  // The definition level contributed by ancestors above the nearest
  // repeated ancestor. Definition levels below it mean the slot was
  // absorbed by that ancestor; levels in `[top_parent_def_level,
  // max_def_level)` mean a null at or under this leaf.
  top_parent_def_level: i16,

  // Whether the leaf's immediate parent is a repeated group, i.e. the leaf
  // is a direct list element.
  has_repeated_parent: bool,

  // The path of this column. For instance, "a.b.c.d".
  path: ColumnPath
}

impl ColumnDescriptor {
  // Ctor is private outside of this module - should be created
  // via `SchemaDescriptor`.
  fn new(primitive_type: TypePtr, max_def_level: i16, max_rep_level: i16,
         top_parent_def_level: i16, has_repeated_parent: bool,
         path: ColumnPath) -> Self {
    Self {
      primitive_type, max_def_level, max_rep_level,
      top_parent_def_level, has_repeated_parent, path
    }
  }

  pub fn max_def_level(&self) -> i16 {
    self.max_def_level
  }

  pub fn max_rep_level(&self) -> i16 {
    self.max_rep_level
  }

  pub fn top_parent_def_level(&self) -> i16 {
    self.top_parent_def_level
  }

  pub fn has_repeated_parent(&self) -> bool {
    self.has_repeated_parent
  }

  /// Whether the leaf itself is declared optional.
  pub fn is_optional(&self) -> bool {
    self.primitive_type.get_basic_info().repetition() == Repetition::OPTIONAL
  }

  pub fn path(&self) -> &ColumnPath {
    &self.path
  }

  pub fn primitive_type(&self) -> &Type {
    self.primitive_type.as_ref()
  }

  pub fn name(&self) -> &str {
    self.primitive_type.name()
  }

  pub fn logical_type(&self) -> LogicalType {
    self.primitive_type.get_basic_info().logical_type()
  }

  pub fn physical_type(&self) -> PhysicalType {
    match self.primitive_type.as_ref() {
      &Type::PrimitiveType { physical_type, .. } => physical_type,
      _ => panic!("Expected primitive type!")
    }
  }

  pub fn type_length(&self) -> i32 {
    match self.primitive_type.as_ref() {
      &Type::PrimitiveType { type_length, .. } => type_length,
      _ => panic!("Expected primitive type!")
    }
  }
}

/// A schema descriptor. This encapsulates the top-level schema for all
/// the columns, as well as the descriptors for all the primitive columns.
pub struct SchemaDescriptor {
  // The top-level schema (the "message" type).
  // This must be a `GroupType` where each field is a root column type in the
  // schema.
  schema: TypePtr,

  // All the descriptors for primitive columns in this schema, constructed
  // from `schema` in DFS order.
  leaves: Vec<ColumnDescPtr>,

  // Mapping from a leaf column's index to the index of the top-level schema
  // field it belongs to. Ascending, since leaves are collected in DFS order.
  leaf_to_field: Vec<usize>
}

impl SchemaDescriptor {
  pub fn new(tp: TypePtr) -> Self {
    assert!(tp.is_group(), "SchemaDescriptor should take a GroupType");
    let mut leaves = vec!();
    let mut leaf_to_field = vec!();
    for (field_idx, f) in tp.get_fields().iter().enumerate() {
      let mut path = vec!();
      build_tree(f, field_idx, 0, 0, 0, false,
                 &mut leaves, &mut leaf_to_field, &mut path);
    }
    Self { schema: tp, leaves: leaves, leaf_to_field: leaf_to_field }
  }

  pub fn column(&self, i: usize) -> ColumnDescPtr {
    assert!(i < self.leaves.len(),
            "Index out of bound: {} not in [0, {})", i, self.leaves.len());
    self.leaves[i].clone()
  }

  pub fn columns(&self) -> &[ColumnDescPtr] {
    &self.leaves
  }

  pub fn num_columns(&self) -> usize {
    self.leaves.len()
  }

  /// Number of top-level schema fields.
  pub fn num_fields(&self) -> usize {
    self.schema.get_fields().len()
  }

  /// Index of the top-level schema field that leaf column `i` belongs to.
  pub fn column_root_idx(&self, i: usize) -> usize {
    assert!(i < self.leaves.len(),
            "Index out of bound: {} not in [0, {})", i, self.leaves.len());
    self.leaf_to_field[i]
  }

  /// The top-level schema field that leaf column `i` belongs to.
  pub fn get_column_root(&self, i: usize) -> &Type {
    self.schema.get_fields()[self.column_root_idx(i)].as_ref()
  }

  /// Index of the first leaf column inside top-level field `field_idx`.
  pub fn first_column_of_field(&self, field_idx: usize) -> usize {
    self.leaf_to_field.partition_point(|&root| root < field_idx)
  }

  pub fn root_schema(&self) -> &Type {
    self.schema.as_ref()
  }

  pub fn root_schema_ptr(&self) -> TypePtr {
    self.schema.clone()
  }

  pub fn name(&self) -> &str {
    self.schema.name()
  }
}

// Walks one top-level field, collecting a descriptor for every primitive
// leaf. `max_def_level`/`max_rep_level` accumulate per the Dremel rules:
// OPTIONAL adds a definition level, REPEATED adds both a definition and a
// repetition level. `top_parent_def_level` tracks the definition level
// reached just after the most recent repeated ancestor.
fn build_tree(tp: &TypePtr, field_idx: usize,
              mut max_def_level: i16, mut max_rep_level: i16,
              mut top_parent_def_level: i16, parent_is_repeated: bool,
              leaves: &mut Vec<ColumnDescPtr>,
              leaf_to_field: &mut Vec<usize>,
              path_so_far: &mut Vec<String>) {
  assert!(tp.get_basic_info().has_repetition());

  path_so_far.push(String::from(tp.name()));
  match tp.get_basic_info().repetition() {
    Repetition::OPTIONAL => {
      max_def_level += 1;
    },
    Repetition::REPEATED => {
      max_def_level += 1;
      max_rep_level += 1;
      top_parent_def_level = max_def_level;
    },
    Repetition::REQUIRED => {}
  }

  match tp.as_ref() {
    Type::PrimitiveType { .. } => {
      leaves.push(Arc::new(ColumnDescriptor::new(
        tp.clone(), max_def_level, max_rep_level, top_parent_def_level,
        parent_is_repeated, ColumnPath::new(path_so_far.clone()))));
      leaf_to_field.push(field_idx);
    },
    Type::GroupType { ref fields, .. } => {
      let is_repeated = tp.get_basic_info().repetition() == Repetition::REPEATED;
      for f in fields {
        build_tree(f, field_idx, max_def_level, max_rep_level,
                   top_parent_def_level, is_repeated,
                   leaves, leaf_to_field, path_so_far);
        path_so_far.pop();
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_primitive_type() {
    let result = Type::new_primitive_type(
      "foo", Repetition::OPTIONAL, PhysicalType::INT32,
      LogicalType::INT_32, 0, 0, 0, Some(0));
    assert!(result.is_ok());

    if let Ok(tp) = result {
      assert!(tp.is_primitive());
      assert!(!tp.is_group());
      let basic_info = tp.get_basic_info();
      assert_eq!(basic_info.repetition(), Repetition::OPTIONAL);
      assert_eq!(basic_info.logical_type(), LogicalType::INT_32);
      assert_eq!(basic_info.id(), 0);
      match tp {
        Type::PrimitiveType { physical_type, .. } => {
          assert_eq!(physical_type, PhysicalType::INT32);
        },
        _ => panic!()
      }
    }

    // Test illegal inputs
    let result = Type::new_primitive_type(
      "foo", Repetition::REPEATED, PhysicalType::INT64,
      LogicalType::BSON, 0, 0, 0, None);
    assert!(result.is_err());
    if let Err(e) = result {
      assert!(e.to_string().contains("BSON can only annotate BYTE_ARRAY fields"));
    }

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::INT96,
      LogicalType::DECIMAL, 0, -1, -1, None);
    assert!(result.is_err());

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::BYTE_ARRAY,
      LogicalType::DECIMAL, 0, -1, -1, None);
    if let Err(e) = result {
      assert!(e.to_string().contains("Invalid DECIMAL precision: -1"));
    }

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::BYTE_ARRAY,
      LogicalType::DECIMAL, 0, 1, 2, None);
    if let Err(e) = result {
      assert!(e.to_string().contains(
        "scale (2) cannot be greater than precision (1)"));
    }

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::INT64,
      LogicalType::UINT_8, 0, 0, 0, None);
    if let Err(e) = result {
      assert!(e.to_string().contains("UINT_8 can only annotate INT32"));
    }

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::INT32,
      LogicalType::TIME_MICROS, 0, 0, 0, None);
    if let Err(e) = result {
      assert!(e.to_string().contains("TIME_MICROS can only annotate INT64"));
    }

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::BYTE_ARRAY,
      LogicalType::INTERVAL, 0, 0, 0, None);
    if let Err(e) = result {
      assert!(e.to_string().contains("INTERVAL can only annotate FIXED(12)"));
    }

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::FIXED_LEN_BYTE_ARRAY,
      LogicalType::NONE, -1, 0, 0, None);
    if let Err(e) = result {
      assert!(e.to_string().contains("Invalid FIXED_LEN_BYTE_ARRAY length: -1"));
    }
  }

  #[test]
  fn test_group_type() {
    let f1 = Type::new_primitive_type(
      "f1", Repetition::OPTIONAL, PhysicalType::INT32,
      LogicalType::INT_32, 0, 0, 0, Some(0)).unwrap();
    let f2 = Type::new_primitive_type(
      "f2", Repetition::OPTIONAL, PhysicalType::BYTE_ARRAY,
      LogicalType::UTF8, 0, 0, 0, Some(1)).unwrap();
    let grp = Type::new_group_type(
      "foo", Some(Repetition::REPEATED), LogicalType::NONE,
      vec![Arc::new(f1), Arc::new(f2)], Some(1)).unwrap();

    assert!(grp.is_group());
    assert!(!grp.is_primitive());
    let basic_info = grp.get_basic_info();
    assert_eq!(basic_info.repetition(), Repetition::REPEATED);
    assert_eq!(basic_info.logical_type(), LogicalType::NONE);
    assert_eq!(basic_info.id(), 1);
    assert_eq!(grp.get_fields().len(), 2);
    assert_eq!(grp.get_fields()[0].name(), "f1");
    assert_eq!(grp.get_fields()[1].name(), "f2");
  }

  // message schema {
  //   required int32 a;
  //   optional group b {
  //     optional int64 c;
  //   }
  //   optional group d (LIST) {
  //     repeated group list {
  //       optional binary e (UTF8);
  //     }
  //   }
  // }
  fn test_schema() -> TypePtr {
    let a = Arc::new(Type::new_primitive_type(
      "a", Repetition::REQUIRED, PhysicalType::INT32,
      LogicalType::NONE, 0, 0, 0, None).unwrap());
    let c = Arc::new(Type::new_primitive_type(
      "c", Repetition::OPTIONAL, PhysicalType::INT64,
      LogicalType::NONE, 0, 0, 0, None).unwrap());
    let b = Arc::new(Type::new_group_type(
      "b", Some(Repetition::OPTIONAL), LogicalType::NONE,
      vec![c], None).unwrap());
    let e = Arc::new(Type::new_primitive_type(
      "e", Repetition::OPTIONAL, PhysicalType::BYTE_ARRAY,
      LogicalType::UTF8, 0, 0, 0, None).unwrap());
    let list = Arc::new(Type::new_group_type(
      "list", Some(Repetition::REPEATED), LogicalType::NONE,
      vec![e], None).unwrap());
    let d = Arc::new(Type::new_group_type(
      "d", Some(Repetition::OPTIONAL), LogicalType::LIST,
      vec![list], None).unwrap());
    Arc::new(Type::new_group_type(
      "schema", None, LogicalType::NONE, vec![a, b, d], None).unwrap())
  }

  #[test]
  fn test_schema_descriptor_levels() {
    let descr = SchemaDescriptor::new(test_schema());
    assert_eq!(descr.num_columns(), 3);
    assert_eq!(descr.num_fields(), 3);

    let a = descr.column(0);
    assert_eq!(a.max_def_level(), 0);
    assert_eq!(a.max_rep_level(), 0);
    assert_eq!(a.top_parent_def_level(), 0);
    assert!(!a.has_repeated_parent());
    assert!(!a.is_optional());
    assert_eq!(a.path().string(), "a");
    assert_eq!(a.physical_type(), PhysicalType::INT32);

    let c = descr.column(1);
    assert_eq!(c.max_def_level(), 2);
    assert_eq!(c.max_rep_level(), 0);
    assert_eq!(c.top_parent_def_level(), 0);
    assert!(!c.has_repeated_parent());
    assert!(c.is_optional());
    assert_eq!(c.path().string(), "b.c");

    let e = descr.column(2);
    assert_eq!(e.max_def_level(), 3);
    assert_eq!(e.max_rep_level(), 1);
    assert_eq!(e.top_parent_def_level(), 2);
    assert!(e.has_repeated_parent());
    assert!(e.is_optional());
    assert_eq!(e.path().string(), "d.list.e");
    assert_eq!(e.logical_type(), LogicalType::UTF8);
  }

  #[test]
  fn test_schema_descriptor_field_mapping() {
    let descr = SchemaDescriptor::new(test_schema());
    assert_eq!(descr.column_root_idx(0), 0);
    assert_eq!(descr.column_root_idx(1), 1);
    assert_eq!(descr.column_root_idx(2), 2);
    assert_eq!(descr.get_column_root(1).name(), "b");
    assert_eq!(descr.first_column_of_field(0), 0);
    assert_eq!(descr.first_column_of_field(1), 1);
    assert_eq!(descr.first_column_of_field(2), 2);
    assert_eq!(descr.name(), "schema");
    assert!(descr.root_schema().is_schema());
  }
}
