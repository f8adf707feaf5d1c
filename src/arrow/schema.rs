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

//! Conversion of Parquet schemas to their Arrow counterparts.
//!
//! A conversion is restricted by a projection: a group field survives only
//! if at least one projected leaf lives in its subtree, and its converted
//! shape contains only the surviving children. Maps convert to lists of
//! `{key, value}` structs, mirroring their on-disk encoding.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arrow::datatypes::{DataType as ArrowType, Field, Schema, TimeUnit};

use crate::basic::{LogicalType, Repetition, Type as PhysicalType};
use crate::errors::Result;
use crate::file::metadata::KeyValue;
use crate::schema::types::{ColumnDescriptor, SchemaDescriptor, Type, TypePtr};

/// Convert the complete Parquet schema to an Arrow schema.
pub fn parquet_to_arrow_schema(
  parquet_schema: &SchemaDescriptor,
  key_value_metadata: &Option<Vec<KeyValue>>
) -> Result<Schema> {
  let all_columns = (0..parquet_schema.num_columns()).collect();
  parquet_to_arrow_schema_by_columns(parquet_schema, &all_columns, key_value_metadata)
}

/// Convert the Parquet schema restricted to `column_indices` (leaf column
/// indices in schema DFS order) to an Arrow schema.
pub fn parquet_to_arrow_schema_by_columns(
  parquet_schema: &SchemaDescriptor,
  column_indices: &HashSet<usize>,
  key_value_metadata: &Option<Vec<KeyValue>>
) -> Result<Schema> {
  let mut fields = vec![];
  let mut next_leaf = 0usize;
  for field in parquet_schema.root_schema().get_fields() {
    if let Some(converted) = parquet_node_to_field(field, column_indices, &mut next_leaf)? {
      fields.push(converted);
    }
  }

  let mut metadata = HashMap::new();
  if let Some(kv) = key_value_metadata {
    for pair in kv {
      if let Some(ref value) = pair.value {
        metadata.insert(pair.key.clone(), value.clone());
      }
    }
  }

  Ok(Schema::new_with_metadata(fields, metadata))
}

/// Convert a single leaf column to an Arrow field.
pub fn parquet_to_arrow_field(descr: &ColumnDescriptor) -> Result<Field> {
  let data_type = parquet_primitive_to_arrow_type(
    descr.physical_type(), descr.logical_type(), descr.type_length())?;
  Ok(Field::new(descr.name(), data_type, descr.is_optional()))
}

/// The element node of a LIST-annotated group: its single repeated child
/// must be a group carrying exactly one field.
pub(crate) fn list_element_node(node: &Type) -> Result<&TypePtr> {
  let fields = node.get_fields();
  if fields.len() != 1 {
    return Err(invalid_err!(
      "LIST group {} must have a single repeated child, found {} children",
      node.name(), fields.len()));
  }
  let repeated = &fields[0];
  if repeated.get_basic_info().repetition() != Repetition::REPEATED {
    return Err(invalid_err!(
      "child of LIST group {} is not repeated", node.name()));
  }
  if !repeated.is_group() || repeated.get_fields().len() != 1 {
    return Err(nyi_err!(
      "legacy LIST encodings are not supported for group {}", node.name()));
  }
  Ok(&repeated.get_fields()[0])
}

/// The repeated `{key, value}` group of a MAP-annotated node.
pub(crate) fn map_key_value_node(node: &Type) -> Result<&TypePtr> {
  let fields = node.get_fields();
  if fields.len() != 1 {
    return Err(invalid_err!(
      "MAP group {} must have a single repeated child, found {} children",
      node.name(), fields.len()));
  }
  let key_value = &fields[0];
  if key_value.get_basic_info().repetition() != Repetition::REPEATED
     || !key_value.is_group() {
    return Err(invalid_err!(
      "child of MAP group {} is not a repeated group", node.name()));
  }
  let kv_fields = key_value.get_fields();
  if kv_fields.len() != 2
     || kv_fields[0].name() != "key" || kv_fields[1].name() != "value" {
    return Err(invalid_err!(
      "MAP group {} must contain key and value fields", node.name()));
  }
  Ok(key_value)
}

// Convert one schema node, walking `next_leaf` over every primitive in the
// subtree whether projected or not so leaf indices stay aligned with the
// schema DFS order.
fn parquet_node_to_field(
  node: &TypePtr,
  column_indices: &HashSet<usize>,
  next_leaf: &mut usize
) -> Result<Option<Field>> {
  let info = node.get_basic_info();
  let nullable = info.repetition() == Repetition::OPTIONAL;

  match node.as_ref() {
    Type::PrimitiveType { physical_type, type_length, .. } => {
      if info.repetition() == Repetition::REPEATED {
        return Err(nyi_err!(
          "unannotated repeated field {} is not supported", node.name()));
      }
      let column_index = *next_leaf;
      *next_leaf += 1;
      if !column_indices.contains(&column_index) {
        return Ok(None);
      }
      let data_type = parquet_primitive_to_arrow_type(
        *physical_type, info.logical_type(), *type_length)?;
      Ok(Some(Field::new(node.name(), data_type, nullable)))
    },
    Type::GroupType { ref fields, .. } => {
      match info.logical_type() {
        LogicalType::LIST => {
          let element = list_element_node(node)?;
          let element_field = parquet_node_to_field(element, column_indices, next_leaf)?;
          Ok(element_field.map(|f| {
            Field::new(node.name(), ArrowType::List(Arc::new(f)), nullable)
          }))
        },
        LogicalType::MAP | LogicalType::MAP_KEY_VALUE => {
          let key_value = map_key_value_node(node)?;
          let mut entries = vec![];
          for f in key_value.get_fields() {
            if let Some(converted) = parquet_node_to_field(f, column_indices, next_leaf)? {
              entries.push(converted);
            }
          }
          if entries.is_empty() {
            return Ok(None);
          }
          let entries_field = Field::new(
            key_value.name(), ArrowType::Struct(entries.into()), false);
          Ok(Some(Field::new(
            node.name(), ArrowType::List(Arc::new(entries_field)), nullable)))
        },
        _ => {
          if info.repetition() == Repetition::REPEATED {
            return Err(nyi_err!(
              "unannotated repeated group {} is not supported", node.name()));
          }
          let mut children = vec![];
          for f in fields {
            if let Some(converted) = parquet_node_to_field(f, column_indices, next_leaf)? {
              children.push(converted);
            }
          }
          if children.is_empty() {
            return Ok(None);
          }
          Ok(Some(Field::new(
            node.name(), ArrowType::Struct(children.into()), nullable)))
        }
      }
    }
  }
}

fn parquet_primitive_to_arrow_type(
  physical_type: PhysicalType,
  logical_type: LogicalType,
  type_length: i32
) -> Result<ArrowType> {
  match (physical_type, logical_type) {
    (PhysicalType::BOOLEAN, LogicalType::NONE) => Ok(ArrowType::Boolean),
    (PhysicalType::INT32, LogicalType::NONE) |
    (PhysicalType::INT32, LogicalType::INT_32) => Ok(ArrowType::Int32),
    (PhysicalType::INT32, LogicalType::INT_8) => Ok(ArrowType::Int8),
    (PhysicalType::INT32, LogicalType::INT_16) => Ok(ArrowType::Int16),
    (PhysicalType::INT32, LogicalType::UINT_8) => Ok(ArrowType::UInt8),
    (PhysicalType::INT32, LogicalType::UINT_16) => Ok(ArrowType::UInt16),
    (PhysicalType::INT32, LogicalType::UINT_32) => Ok(ArrowType::UInt32),
    (PhysicalType::INT32, LogicalType::DATE) => Ok(ArrowType::Date32),
    (PhysicalType::INT32, LogicalType::TIME_MILLIS) => {
      Ok(ArrowType::Time32(TimeUnit::Millisecond))
    },
    (PhysicalType::INT64, LogicalType::NONE) |
    (PhysicalType::INT64, LogicalType::INT_64) => Ok(ArrowType::Int64),
    (PhysicalType::INT64, LogicalType::UINT_64) => Ok(ArrowType::UInt64),
    (PhysicalType::INT64, LogicalType::TIME_MICROS) => {
      Ok(ArrowType::Time64(TimeUnit::Microsecond))
    },
    (PhysicalType::INT64, LogicalType::TIMESTAMP_MILLIS) => {
      Ok(ArrowType::Timestamp(TimeUnit::Millisecond, None))
    },
    (PhysicalType::INT64, LogicalType::TIMESTAMP_MICROS) => {
      Ok(ArrowType::Timestamp(TimeUnit::Microsecond, None))
    },
    (PhysicalType::INT96, LogicalType::NONE) => {
      Ok(ArrowType::Timestamp(TimeUnit::Nanosecond, None))
    },
    (PhysicalType::FLOAT, LogicalType::NONE) => Ok(ArrowType::Float32),
    (PhysicalType::DOUBLE, LogicalType::NONE) => Ok(ArrowType::Float64),
    (PhysicalType::BYTE_ARRAY, LogicalType::UTF8) |
    (PhysicalType::BYTE_ARRAY, LogicalType::ENUM) |
    (PhysicalType::BYTE_ARRAY, LogicalType::JSON) => Ok(ArrowType::Utf8),
    (PhysicalType::BYTE_ARRAY, LogicalType::NONE) |
    (PhysicalType::BYTE_ARRAY, LogicalType::BSON) => Ok(ArrowType::Binary),
    (PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalType::NONE) => {
      Ok(ArrowType::FixedSizeBinary(type_length))
    },
    (physical, logical) => Err(nyi_err!(
      "reading {} columns annotated {} is not supported", physical, logical)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::test_common::{
    group, leaf, list_of, map_of, message, optional_leaf,
  };

  #[test]
  fn test_flat_primitives() {
    let schema = SchemaDescriptor::new(message(vec![
      leaf("b", PhysicalType::BOOLEAN, LogicalType::NONE),
      optional_leaf("i", PhysicalType::INT32, LogicalType::NONE),
      optional_leaf("ts", PhysicalType::INT96, LogicalType::NONE),
      leaf("s", PhysicalType::BYTE_ARRAY, LogicalType::UTF8),
      optional_leaf("d", PhysicalType::INT32, LogicalType::DATE),
    ]));
    let converted = parquet_to_arrow_schema(&schema, &None).unwrap();

    assert_eq!(converted.fields().len(), 5);
    assert_eq!(converted.field(0),
               &Field::new("b", ArrowType::Boolean, false));
    assert_eq!(converted.field(1), &Field::new("i", ArrowType::Int32, true));
    assert_eq!(
      converted.field(2),
      &Field::new("ts", ArrowType::Timestamp(TimeUnit::Nanosecond, None), true));
    assert_eq!(converted.field(3), &Field::new("s", ArrowType::Utf8, false));
    assert_eq!(converted.field(4), &Field::new("d", ArrowType::Date32, true));
  }

  #[test]
  fn test_unsigned_and_times() {
    let schema = SchemaDescriptor::new(message(vec![
      optional_leaf("u8", PhysicalType::INT32, LogicalType::UINT_8),
      optional_leaf("u64", PhysicalType::INT64, LogicalType::UINT_64),
      optional_leaf("t32", PhysicalType::INT32, LogicalType::TIME_MILLIS),
      optional_leaf("t64", PhysicalType::INT64, LogicalType::TIME_MICROS),
      optional_leaf("ms", PhysicalType::INT64, LogicalType::TIMESTAMP_MILLIS),
    ]));
    let converted = parquet_to_arrow_schema(&schema, &None).unwrap();

    assert_eq!(converted.field(0).data_type(), &ArrowType::UInt8);
    assert_eq!(converted.field(1).data_type(), &ArrowType::UInt64);
    assert_eq!(converted.field(2).data_type(),
               &ArrowType::Time32(TimeUnit::Millisecond));
    assert_eq!(converted.field(3).data_type(),
               &ArrowType::Time64(TimeUnit::Microsecond));
    assert_eq!(converted.field(4).data_type(),
               &ArrowType::Timestamp(TimeUnit::Millisecond, None));
  }

  #[test]
  fn test_nested_shapes() {
    // message schema {
    //   optional group s { optional int32 a; required binary b (UTF8); }
    //   optional group l (LIST) { repeated group list { optional int32 item; } }
    //   optional group m (MAP) {
    //     repeated group key_value {
    //       required binary key (UTF8); optional int32 value;
    //     }
    //   }
    // }
    let schema = SchemaDescriptor::new(message(vec![
      group("s", vec![
        optional_leaf("a", PhysicalType::INT32, LogicalType::NONE),
        leaf("b", PhysicalType::BYTE_ARRAY, LogicalType::UTF8),
      ]),
      list_of("l", optional_leaf("item", PhysicalType::INT32, LogicalType::NONE)),
      map_of("m",
             leaf("key", PhysicalType::BYTE_ARRAY, LogicalType::UTF8),
             optional_leaf("value", PhysicalType::INT32, LogicalType::NONE)),
    ]));
    let converted = parquet_to_arrow_schema(&schema, &None).unwrap();

    let s = converted.field(0);
    assert_eq!(
      s.data_type(),
      &ArrowType::Struct(vec![
        Field::new("a", ArrowType::Int32, true),
        Field::new("b", ArrowType::Utf8, false),
      ].into()));

    let l = converted.field(1);
    assert_eq!(
      l.data_type(),
      &ArrowType::List(Arc::new(Field::new("item", ArrowType::Int32, true))));
    assert!(l.is_nullable());

    let m = converted.field(2);
    assert_eq!(
      m.data_type(),
      &ArrowType::List(Arc::new(Field::new(
        "key_value",
        ArrowType::Struct(vec![
          Field::new("key", ArrowType::Utf8, false),
          Field::new("value", ArrowType::Int32, true),
        ].into()),
        false))));
  }

  #[test]
  fn test_projection() {
    let schema = SchemaDescriptor::new(message(vec![
      leaf("a", PhysicalType::INT32, LogicalType::NONE),
      group("s", vec![
        optional_leaf("x", PhysicalType::INT32, LogicalType::NONE),
        optional_leaf("y", PhysicalType::INT64, LogicalType::NONE),
      ]),
      leaf("z", PhysicalType::DOUBLE, LogicalType::NONE),
    ]));

    // project leaf 2 ("s.y") and leaf 3 ("z")
    let indices: HashSet<usize> = vec![2, 3].into_iter().collect();
    let converted =
      parquet_to_arrow_schema_by_columns(&schema, &indices, &None).unwrap();

    assert_eq!(converted.fields().len(), 2);
    assert_eq!(converted.field(0).name(), "s");
    assert_eq!(
      converted.field(0).data_type(),
      &ArrowType::Struct(vec![Field::new("y", ArrowType::Int64, true)].into()));
    assert_eq!(converted.field(1).name(), "z");
  }

  #[test]
  fn test_key_value_metadata() {
    let schema = SchemaDescriptor::new(message(vec![
      leaf("a", PhysicalType::INT32, LogicalType::NONE),
    ]));
    let kv = Some(vec![
      KeyValue::new("writer".to_owned(), Some("unit-test".to_owned())),
      KeyValue::new("empty".to_owned(), None),
    ]);
    let converted = parquet_to_arrow_schema(&schema, &kv).unwrap();
    assert_eq!(converted.metadata().get("writer").map(|s| s.as_str()),
               Some("unit-test"));
    assert!(!converted.metadata().contains_key("empty"));
  }

  #[test]
  fn test_unsupported_types() {
    let schema = SchemaDescriptor::new(message(vec![
      leaf("d", PhysicalType::INT32, LogicalType::NONE),
    ]));
    assert!(parquet_to_arrow_field(schema.column(0).as_ref()).is_ok());

    let result = parquet_primitive_to_arrow_type(
      PhysicalType::INT32, LogicalType::DECIMAL, 0);
    match result {
      Err(crate::errors::ParquetError::NotImplemented(_)) => {},
      other => panic!("expected NotImplemented, got {:?}", other),
    }
  }
}
