use std::sync::Arc;

use structcopy::copy::{Nullable, Opaque, ScanError, Scanner, StructType, Type, Value};

/// Box an opaque collaborator into a [`Value`].
pub fn opaque<T: Opaque>(item: T) -> Value {
	Value::Opaque(Box::new(item))
}

/// Nullable float in the shape database drivers hand out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NullFloat64 {
	/// Payload, meaningful only when `valid`.
	pub float64: f64,
	/// Whether a value is present.
	pub valid: bool,
}

impl NullFloat64 {
	/// Present value.
	pub fn some(float64: f64) -> Self {
		Self { float64, valid: true }
	}
}

impl Nullable for NullFloat64 {
	fn value(&self) -> Option<Value> {
		self.valid.then_some(Value::F64(self.float64))
	}
}

impl Scanner for NullFloat64 {
	fn scan(&mut self, src: Option<&Value>) -> Result<(), ScanError> {
		let Some(src) = src else {
			*self = Self::default();
			return Ok(());
		};
		let float64 = src
			.as_f64()
			.or_else(|| src.as_i64().map(|item| item as f64))
			.or_else(|| src.as_u64().map(|item| item as f64))
			.ok_or_else(|| ScanError::new(format!("cannot scan {} into NullFloat64", src.ty())))?;
		*self = Self::some(float64);
		Ok(())
	}
}

impl Opaque for NullFloat64 {
	fn as_nullable(&self) -> Option<&dyn Nullable> {
		Some(self)
	}

	fn as_scanner(&mut self) -> Option<&mut dyn Scanner> {
		Some(self)
	}
}

/// Nullable string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NullString {
	/// Payload, meaningful only when `valid`.
	pub string: String,
	/// Whether a value is present.
	pub valid: bool,
}

impl NullString {
	/// Present value.
	pub fn some(string: &str) -> Self {
		Self {
			string: string.to_owned(),
			valid: true,
		}
	}
}

impl Nullable for NullString {
	fn value(&self) -> Option<Value> {
		self.valid.then(|| Value::String(self.string.clone()))
	}
}

impl Scanner for NullString {
	fn scan(&mut self, src: Option<&Value>) -> Result<(), ScanError> {
		*self = match src {
			None => Self::default(),
			Some(Value::String(item)) => Self::some(item),
			Some(Value::Bytes(item)) => Self::some(&String::from_utf8_lossy(item)),
			Some(other) => return Err(ScanError::new(format!("cannot scan {} into NullString", other.ty()))),
		};
		Ok(())
	}
}

impl Opaque for NullString {
	fn as_nullable(&self) -> Option<&dyn Nullable> {
		Some(self)
	}

	fn as_scanner(&mut self) -> Option<&mut dyn Scanner> {
		Some(self)
	}
}

/// Point in time as Unix seconds; copied whole, with no capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp(pub i64);

impl Opaque for Timestamp {}

/// Struct-shaped nullable integer: `Int64` is present when `Valid` is set.
pub fn null_int64_type() -> Arc<StructType> {
	StructType::builder("NullInt64")
		.field("Int64", Type::I64)
		.field("Valid", Type::Bool)
		.nullable(|this| {
			let valid = this.get("Valid").and_then(Value::as_bool).unwrap_or_default();
			this.get("Int64").filter(|_| valid).cloned()
		})
		.build()
}
