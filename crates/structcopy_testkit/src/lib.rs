//! Shared fixtures for workspace tests.

mod nulls;
mod records;

pub use nulls::{NullFloat64, NullString, Timestamp, null_int64_type, opaque};
pub use records::{
	base_type, check_employee, check_empty_employee, embed_type, employee_type, json_user_type, new_user_type, notes,
	scanner_struct_type, scanner_struct_to_type, scanner_value_type, same_name_1_type, same_name_2_type, user,
	user_alias_type, user_type,
};
