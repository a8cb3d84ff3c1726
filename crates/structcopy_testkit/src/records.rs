use std::sync::Arc;

use structcopy::copy::{ScanError, StructBuilder, StructType, StructValue, Type, Value};

use crate::{NullFloat64, Timestamp};

fn user_fields(name: &str) -> StructBuilder {
	StructType::builder(name)
		.field("Name", Type::String)
		.field("Birthday", Type::reference(Type::opaque::<Timestamp>()))
		.field("Nickname", Type::String)
		.field("Role", Type::String)
		.field("Age", Type::I32)
		.field("FakeAge", Type::reference(Type::I32))
		.field("Notes", Type::seq(Type::String))
		.private_field("flags", Type::Bytes)
}

/// `User` record with a `DoubleAge` accessor.
pub fn user_type() -> Arc<StructType> {
	user_fields("User")
		.getter("DoubleAge", Type::I32, |this| {
			let age = this.get("Age").and_then(Value::as_i64).unwrap_or_default();
			Value::I32((age * 2) as i32)
		})
		.build()
}

/// Same layout as [`user_type`] under another name, without methods.
pub fn user_alias_type() -> Arc<StructType> {
	user_fields("UserAlias").build()
}

/// `Employee` record with a `Role` setter that fills `SuperRule`.
pub fn employee_type() -> Arc<StructType> {
	StructType::builder("Employee")
		.field("Name", Type::String)
		.field("Birthday", Type::reference(Type::opaque::<Timestamp>()))
		.field("Nickname", Type::reference(Type::String))
		.field("Age", Type::I64)
		.field("FakeAge", Type::I64)
		.field("EmployeID", Type::I64)
		.field("DoubleAge", Type::I32)
		.field("SuperRule", Type::String)
		.field("Notes", Type::seq(Type::String))
		.private_field("flags", Type::Bytes)
		.setter("Role", Type::String, |this, role| {
			let role = role.as_str().unwrap_or_default();
			if let Some(slot) = this.get_mut("SuperRule") {
				*slot = Value::from(format!("Super {role}"));
			}
		})
		.build()
}

/// String sequence value.
pub fn notes(items: &[&str]) -> Value {
	Value::seq(Type::String, items.iter().copied().map(Value::from).collect())
}

/// `User` instance; the nickname is the lowercased name.
pub fn user(name: &str, age: i32, role: &str, items: &[&str]) -> StructValue {
	StructValue::zero(&user_type())
		.with("Name", name)
		.with("Nickname", name.to_lowercase())
		.with("Age", age)
		.with("Role", role)
		.with("Notes", notes(items))
}

/// Assert that `employee` holds everything mapped from `user`.
pub fn check_employee(employee: &StructValue, user: &StructValue, case: &str) {
	let field = |item: &StructValue, name: &str| item.get(name).cloned().unwrap_or_else(|| panic!("{case}: missing field {name}"));

	assert_eq!(field(employee, "Name"), field(user, "Name"), "{case}: Name");
	assert_eq!(field(employee, "Nickname").indirect(), Some(&field(user, "Nickname")), "{case}: Nickname");
	assert_eq!(field(employee, "Birthday"), field(user, "Birthday"), "{case}: Birthday");

	let age = field(user, "Age").as_i64();
	assert_eq!(field(employee, "Age").as_i64(), age, "{case}: Age");
	if let Some(fake) = field(user, "FakeAge").indirect() {
		assert_eq!(field(employee, "FakeAge").as_i64(), fake.as_i64(), "{case}: FakeAge");
	}
	assert_eq!(field(employee, "DoubleAge").as_i64(), age.map(|age| age * 2), "{case}: DoubleAge");

	let role = field(user, "Role");
	let expected = format!("Super {}", role.as_str().unwrap_or_default());
	assert_eq!(field(employee, "SuperRule").as_str(), Some(expected.as_str()), "{case}: SuperRule");
	assert_eq!(field(employee, "Notes"), field(user, "Notes"), "{case}: Notes");
}

/// Assert that `employee` is still the zero `Employee`.
pub fn check_empty_employee(employee: &StructValue, case: &str) {
	assert_eq!(employee, &StructValue::zero(&employee_type()), "{case}: employee should be empty");
}

/// Record whose float and byte fields are nullable or raw.
pub fn new_user_type() -> Arc<StructType> {
	StructType::builder("NewUser")
		.field("Ssn", Type::Bytes)
		.field("Income", Type::opaque::<NullFloat64>())
		.field("IncomePtr", Type::opaque::<NullFloat64>())
		.field("SsnPtr", Type::Bytes)
		.build()
}

/// Embeds [`user_alias_type`] and shadows its fields with plain and reference types.
pub fn json_user_type() -> Arc<StructType> {
	StructType::builder("JsonUser")
		.embed(&user_alias_type())
		.field("Income", Type::F64)
		.field("IncomePtr", Type::reference(Type::F64))
		.field("Ssn", Type::String)
		.field("SsnPtr", Type::reference(Type::String))
		.build()
}

/// `Base` with two counters and an optional user.
pub fn base_type() -> Arc<StructType> {
	StructType::builder("Base")
		.field("BaseField1", Type::I64)
		.field("BaseField2", Type::I64)
		.field("User", Type::reference(Type::Struct(user_type())))
		.build()
}

/// `Embed` with [`base_type`] embedded by value after its own fields.
pub fn embed_type() -> Arc<StructType> {
	StructType::builder("Embed")
		.field("EmbedField1", Type::I64)
		.field("EmbedField2", Type::I64)
		.embed(&base_type())
		.build()
}

/// `A: string, B: i64, C: Timestamp`.
pub fn same_name_1_type() -> Arc<StructType> {
	StructType::builder("SameName1")
		.field("A", Type::String)
		.field("B", Type::I64)
		.field("C", Type::opaque::<Timestamp>())
		.build()
}

/// `A: string, B: Timestamp, C: i64`.
pub fn same_name_2_type() -> Arc<StructType> {
	StructType::builder("SameName2")
		.field("A", Type::String)
		.field("B", Type::opaque::<Timestamp>())
		.field("C", Type::I64)
		.build()
}

/// Struct whose scanner rejects every input.
pub fn scanner_value_type() -> Arc<StructType> {
	StructType::builder("ScannerValue")
		.field("V", Type::I64)
		.scanner(|_, _| Err(ScanError::new("I failed")))
		.build()
}

/// Holds a reference to a [`scanner_value_type`].
pub fn scanner_struct_type() -> Arc<StructType> {
	StructType::builder("ScannerStruct")
		.field("V", Type::reference(Type::Struct(scanner_value_type())))
		.build()
}

/// Same layout as [`scanner_struct_type`] under another name.
pub fn scanner_struct_to_type() -> Arc<StructType> {
	StructType::builder("ScannerStructTo")
		.field("V", Type::reference(Type::Struct(scanner_value_type())))
		.build()
}
