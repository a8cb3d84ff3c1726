use std::sync::Arc;

use super::set;
use crate::copy::{CopyError, CopyOptions, ScanError, StructType, StructValue, Type, Value, copy, copy_with};

fn point_type() -> Arc<StructType> {
	StructType::builder("Point").field("X", Type::I32).field("Y", Type::I32).build()
}

fn point(x: i32, y: i32) -> Value {
	Value::Struct(StructValue::zero(&point_type()).with("X", x).with("Y", y))
}

fn target<'a>(value: &'a Value) -> &'a StructValue {
	value.indirect().and_then(Value::as_struct).expect("destination holds a struct")
}

mod set_primitive {
	use super::*;

	#[test]
	fn converts_scalars() {
		let mut slot = Value::I64(0);
		assert!(set(&mut slot, &Value::I32(18)));
		assert_eq!(slot, Value::I64(18));
	}

	#[test]
	fn allocates_through_every_null_reference() {
		let mut slot = Value::null(Type::reference(Type::String));
		assert!(set(&mut slot, &Value::from("nick")));
		assert_eq!(slot.indirect(), Some(&Value::from("nick")));
		assert_eq!(slot.ty(), Type::reference(Type::reference(Type::String)));
	}

	#[test]
	fn null_source_clears_reference() {
		let mut slot = Value::reference(Value::F64(2.5));
		assert!(set(&mut slot, &Value::null(Type::F64)));
		assert!(slot.is_null());
	}

	#[test]
	fn reference_source_is_dereferenced() {
		let mut slot = Value::I64(0);
		assert!(set(&mut slot, &Value::reference(Value::I32(12))));
		assert_eq!(slot, Value::I64(12));
	}

	#[test]
	fn null_reference_into_plain_slot_keeps_slot() {
		let mut slot = Value::I64(5);
		assert!(set(&mut slot, &Value::null(Type::I32)));
		assert_eq!(slot, Value::I64(5));
	}

	#[test]
	fn incompatible_types_report_failure() {
		let mut slot = Value::Bool(false);
		assert!(!set(&mut slot, &Value::from("yes")));
		assert_eq!(slot, Value::Bool(false));
	}

	#[test]
	fn scanner_takes_unconvertible_input() {
		let counter = StructType::builder("Counter")
			.field("N", Type::I64)
			.scanner(|this, src| {
				let text = src.and_then(Value::as_str).ok_or_else(|| ScanError::new("expected text"))?;
				let parsed = text.parse::<i64>().map_err(|err| ScanError::new(err.to_string()))?;
				if let Some(slot) = this.get_mut("N") {
					*slot = Value::I64(parsed);
				}
				Ok(())
			})
			.build();

		let mut slot = Type::Struct(counter).zero();
		assert!(set(&mut slot, &Value::from("41")));
		assert_eq!(slot.as_struct().and_then(|item| item.get("N")), Some(&Value::I64(41)));

		assert!(!set(&mut slot, &Value::from("not a number")));
		assert!(!set(&mut slot, &Value::Bool(true)));
	}
}

mod entry {
	use super::*;

	#[test]
	fn plain_destination_is_unaddressable() {
		let mut dest = Type::Struct(point_type()).zero();
		assert_eq!(copy(&mut dest, &point(1, 2)), Err(CopyError::DestinationUnaddressable));
	}

	#[test]
	fn null_destination_is_unaddressable() {
		let mut dest = Value::null(Type::Struct(point_type()));
		assert_eq!(copy(&mut dest, &point(1, 2)), Err(CopyError::DestinationUnaddressable));

		let mut nested = Value::reference(Value::null(Type::Struct(point_type())));
		assert_eq!(copy(&mut nested, &point(1, 2)), Err(CopyError::DestinationUnaddressable));
	}

	#[test]
	fn unaddressable_wins_over_null_source() {
		let mut dest = Value::I32(0);
		assert_eq!(copy(&mut dest, &Value::null(Type::I32)), Err(CopyError::DestinationUnaddressable));
	}

	#[test]
	fn null_source_is_noop() {
		let mut dest = Value::reference(point(3, 4));
		copy(&mut dest, &Value::null(Type::Struct(point_type()))).expect("copy succeeds");
		assert_eq!(dest.indirect(), Some(&point(3, 4)));
	}

	#[test]
	fn assignable_scalar_is_stored() {
		let mut dest = Value::reference(Value::I64(0));
		copy(&mut dest, &Value::I64(9)).expect("copy succeeds");
		assert_eq!(dest.indirect(), Some(&Value::I64(9)));
	}

	#[test]
	fn non_assignable_scalar_is_noop() {
		let mut dest = Value::reference(Value::I64(0));
		copy(&mut dest, &Value::I32(9)).expect("copy succeeds");
		assert_eq!(dest.indirect(), Some(&Value::I64(0)));
	}

	#[test]
	fn scalar_sequence_replaces_destination() {
		let mut dest = Value::reference(Value::seq(Type::String, vec![Value::from("old")]));
		let notes = Value::seq(Type::String, vec![Value::from("a"), Value::from("b")]);
		copy(&mut dest, &notes).expect("copy succeeds");
		assert_eq!(dest.indirect(), Some(&notes));
	}

	#[test]
	fn struct_into_scalar_is_noop() {
		let mut dest = Value::reference(Value::I32(0));
		copy(&mut dest, &point(1, 2)).expect("copy succeeds");
		assert_eq!(dest.indirect(), Some(&Value::I32(0)));
	}
}

mod fields {
	use super::*;

	#[test]
	fn name_and_width_scenario() {
		let source_ty = StructType::builder("Source").field("Name", Type::String).field("Age", Type::I32).build();
		let dest_ty = StructType::builder("Dest").field("Name", Type::String).field("Age", Type::I64).build();

		let source = Value::Struct(StructValue::zero(&source_ty).with("Name", "A").with("Age", 18));
		let mut dest = Value::reference(Type::Struct(dest_ty).zero());
		copy(&mut dest, &source).expect("copy succeeds");

		let dest = target(&dest);
		assert_eq!(dest.get("Name"), Some(&Value::from("A")));
		assert_eq!(dest.get("Age"), Some(&Value::I64(18)));
	}

	#[test]
	fn private_fields_are_never_written() {
		let source_ty = StructType::builder("Source").field("flags", Type::Bytes).build();
		let dest_ty = StructType::builder("Dest").private_field("flags", Type::Bytes).build();

		let source = Value::Struct(StructValue::zero(&source_ty).with("flags", Value::Bytes(vec![b'x'])));
		let mut dest = Value::reference(Type::Struct(dest_ty).zero());
		copy(&mut dest, &source).expect("copy succeeds");

		assert_eq!(target(&dest).get("flags"), Some(&Value::Bytes(Vec::new())));
	}

	#[test]
	fn source_is_not_mutated() {
		let holder = StructType::builder("Holder").field("P", Type::reference(Type::Struct(point_type()))).build();
		let source = Value::Struct(StructValue::zero(&holder).with("P", Value::reference(point(1, 2))));
		let before = source.clone();

		let mut dest = Value::reference(Type::Struct(holder).zero());
		copy(&mut dest, &source).expect("copy succeeds");
		assert_eq!(source, before);
		assert_eq!(target(&dest).get("P").and_then(Value::indirect), Some(&point(1, 2)));
	}

	#[test]
	fn nested_struct_with_different_type_is_recursed() {
		let inner_a = StructType::builder("InnerA").field("X", Type::I32).field("Extra", Type::Bool).build();
		let inner_b = StructType::builder("InnerB").field("X", Type::I64).build();
		let outer_a = StructType::builder("OuterA").field("Inner", Type::Struct(inner_a.clone())).build();
		let outer_b = StructType::builder("OuterB").field("Inner", Type::reference(Type::Struct(inner_b))).build();

		let inner = StructValue::zero(&inner_a).with("X", 7).with("Extra", true);
		let source = Value::Struct(StructValue::zero(&outer_a).with("Inner", inner));
		let mut dest = Value::reference(Type::Struct(outer_b.clone()).zero());
		copy(&mut dest, &source).expect("copy succeeds");

		let nested = target(&dest).get("Inner").and_then(Value::indirect).and_then(Value::as_struct).expect("inner allocated");
		assert_eq!(nested.get("X"), Some(&Value::I64(7)));

		let mut shallow = Value::reference(Type::Struct(outer_b).zero());
		copy_with(&mut shallow, &source, &CopyOptions::flat()).expect("copy succeeds");
		let nested = target(&shallow).get("Inner").and_then(Value::indirect).and_then(Value::as_struct).expect("inner allocated");
		assert_eq!(nested.get("X"), Some(&Value::I64(0)));
	}

	#[test]
	fn nested_sequence_field_is_fanned_out() {
		let line_a = StructType::builder("LineA").field("Qty", Type::I32).build();
		let line_b = StructType::builder("LineB").field("Qty", Type::I64).build();
		let order_a = StructType::builder("OrderA").field("Lines", Type::seq(Type::Struct(line_a.clone()))).build();
		let order_b = StructType::builder("OrderB").field("Lines", Type::seq(Type::Struct(line_b))).build();

		let lines = vec![
			Value::Struct(StructValue::zero(&line_a).with("Qty", 1)),
			Value::Struct(StructValue::zero(&line_a).with("Qty", 2)),
		];
		let source = Value::Struct(StructValue::zero(&order_a).with("Lines", Value::seq(Type::Struct(line_a), lines)));
		let mut dest = Value::reference(Type::Struct(order_b).zero());
		copy(&mut dest, &source).expect("copy succeeds");

		let lines = target(&dest).get("Lines").and_then(Value::as_seq).expect("lines present");
		let qty: Vec<_> = lines.items.iter().filter_map(|item| item.as_struct()?.get("Qty")).collect();
		assert_eq!(qty, vec![&Value::I64(1), &Value::I64(2)]);
	}

	#[test]
	fn hooked_field_keeps_destination_type() {
		let money = || {
			StructType::builder("Money")
				.field("Cents", Type::I64)
				.scanner(|_, _| Err(ScanError::new("text only")))
				.build()
		};
		let from_money = money();
		let to_money = money();
		let wallet_a = StructType::builder("WalletA").field("Cash", Type::Struct(from_money.clone())).build();
		let wallet_b = StructType::builder("WalletB").field("Cash", Type::Struct(to_money.clone())).build();

		let cash = StructValue::zero(&from_money).with("Cents", Value::I64(5));
		let source = Value::Struct(StructValue::zero(&wallet_a).with("Cash", cash));
		let mut dest = Value::reference(Type::Struct(wallet_b).zero());
		copy(&mut dest, &source).expect("copy succeeds");

		let copied = target(&dest).get("Cash").and_then(Value::as_struct).expect("cash present");
		assert!(Arc::ptr_eq(&copied.ty, &to_money));
		assert_eq!(copied.get("Cents"), Some(&Value::I64(5)));
	}

	#[test]
	fn one_level_maps_only_the_top() {
		let mut dest = Value::reference(point(0, 0));
		copy_with(&mut dest, &point(1, 2), &CopyOptions { max_depth: 1 }).expect("copy succeeds");
		assert_eq!(dest.indirect(), Some(&point(1, 2)));
	}

	#[test]
	fn zero_depth_skips_everything() {
		let mut dest = Value::reference(point(0, 0));
		copy_with(&mut dest, &point(1, 2), &CopyOptions { max_depth: 0 }).expect("copy succeeds");
		assert_eq!(dest.indirect(), Some(&point(0, 0)));
	}
}

mod methods {
	use super::*;

	#[test]
	fn accessor_fills_field() {
		let source_ty = StructType::builder("Source")
			.field("Age", Type::I32)
			.getter("DoubleAge", Type::I32, |this| {
				let age = this.get("Age").and_then(Value::as_i64).unwrap_or_default();
				Value::I32((age * 2) as i32)
			})
			.build();
		let dest_ty = StructType::builder("Dest").field("DoubleAge", Type::I64).build();

		let source = Value::Struct(StructValue::zero(&source_ty).with("Age", 21));
		let mut dest = Value::reference(Type::Struct(dest_ty).zero());
		copy(&mut dest, &source).expect("copy succeeds");
		assert_eq!(target(&dest).get("DoubleAge"), Some(&Value::I64(42)));
	}

	#[test]
	fn setter_receives_unmatched_field() {
		let source_ty = StructType::builder("Source").field("Role", Type::String).build();
		let dest_ty = StructType::builder("Dest")
			.field("SuperRule", Type::String)
			.setter("Role", Type::String, |this, role| {
				let text = format!("Super {}", role.as_str().unwrap_or_default());
				if let Some(slot) = this.get_mut("SuperRule") {
					*slot = Value::String(text);
				}
			})
			.build();

		let source = Value::Struct(StructValue::zero(&source_ty).with("Role", "Admin"));
		let mut dest = Value::reference(Type::Struct(dest_ty).zero());
		copy(&mut dest, &source).expect("copy succeeds");
		assert_eq!(target(&dest).get("SuperRule"), Some(&Value::from("Super Admin")));
	}

	#[test]
	fn setter_with_wrong_parameter_is_ignored() {
		let source_ty = StructType::builder("Source").field("Role", Type::I32).build();
		let dest_ty = StructType::builder("Dest")
			.field("Hits", Type::I32)
			.setter("Role", Type::String, |this, _| {
				if let Some(slot) = this.get_mut("Hits") {
					*slot = Value::I32(1);
				}
			})
			.build();

		let source = Value::Struct(StructValue::zero(&source_ty).with("Role", 3));
		let mut dest = Value::reference(Type::Struct(dest_ty).zero());
		copy(&mut dest, &source).expect("copy succeeds");
		assert_eq!(target(&dest).get("Hits"), Some(&Value::I32(0)));
	}
}

mod sequences {
	use super::*;

	#[test]
	fn single_struct_fans_out_to_one_element() {
		let mut dest = Value::reference(Value::seq(Type::Struct(point_type()), Vec::new()));
		copy(&mut dest, &point(1, 2)).expect("copy succeeds");

		let seq = dest.indirect().and_then(Value::as_seq).expect("sequence");
		assert_eq!(seq.items, vec![point(1, 2)]);
	}

	#[test]
	fn elements_are_appended_as_references() {
		let points = Value::seq(Type::Struct(point_type()), vec![point(1, 2), point(3, 4)]);
		let existing = Value::reference(point(9, 9));
		let mut dest = Value::reference(Value::seq(Type::reference(Type::Struct(point_type())), vec![existing.clone()]));
		copy(&mut dest, &points).expect("copy succeeds");

		let seq = dest.indirect().and_then(Value::as_seq).expect("sequence");
		assert_eq!(seq.items, vec![existing, Value::reference(point(1, 2)), Value::reference(point(3, 4))]);
	}

	#[test]
	fn null_elements_become_zero_elements() {
		let points = Value::seq(
			Type::reference(Type::Struct(point_type())),
			vec![Value::reference(point(5, 6)), Value::null(Type::Struct(point_type()))],
		);
		let mut dest = Value::reference(Value::seq(Type::Struct(point_type()), Vec::new()));
		copy(&mut dest, &points).expect("copy succeeds");

		let seq = dest.indirect().and_then(Value::as_seq).expect("sequence");
		assert_eq!(seq.items, vec![point(5, 6), point(0, 0)]);
	}

	#[test]
	fn incompatible_element_type_drops_elements() {
		let mut dest = Value::reference(Value::seq(Type::reference(Type::reference(Type::Struct(point_type()))), Vec::new()));
		copy(&mut dest, &point(1, 2)).expect("copy succeeds");
		assert_eq!(dest.indirect().and_then(Value::as_seq).map(|seq| seq.items.len()), Some(0));
	}

	#[test]
	fn sequence_into_struct_is_noop() {
		let points = Value::seq(Type::Struct(point_type()), vec![point(1, 2)]);
		let mut dest = Value::reference(point(0, 0));
		copy(&mut dest, &points).expect("copy succeeds");
		assert_eq!(dest.indirect(), Some(&point(0, 0)));
	}
}
