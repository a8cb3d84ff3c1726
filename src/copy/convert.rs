use crate::copy::{StructValue, Type, Value};

impl Type {
	/// Whether a value of this type may be stored as-is in a slot of type `to`.
	pub fn assignable_to(&self, to: &Type) -> bool {
		self == to
	}

	/// Whether a value of this type converts to `to`.
	///
	/// Numbers convert between every width and signedness, strings and bytes
	/// convert both ways, and structs convert when their field layouts match.
	pub fn convertible_to(&self, to: &Type) -> bool {
		match (self, to) {
			(from, to) if from == to => true,
			(from, to) if from.is_numeric() && to.is_numeric() => true,
			(Type::String, Type::Bytes) | (Type::Bytes, Type::String) => true,
			(Type::Struct(from), Type::Struct(to)) => from.same_layout(to),
			_ => false,
		}
	}
}

/// Convert `from` into a value of type `to`, or `None` when not convertible.
pub(crate) fn convert(from: &Value, to: &Type) -> Option<Value> {
	let from_ty = from.ty();
	if from_ty == *to {
		return Some(from.clone());
	}
	if !from_ty.convertible_to(to) {
		return None;
	}

	match (from, to) {
		(Value::String(text), Type::Bytes) => Some(Value::Bytes(text.clone().into_bytes())),
		(Value::Bytes(bytes), Type::String) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
		(Value::Struct(item), Type::Struct(target)) => Some(Value::Struct(StructValue {
			ty: target.clone(),
			fields: item.fields.clone(),
		})),
		_ => Number::of(from).and_then(|number| number.cast(to)),
	}
}

#[derive(Debug, Clone, Copy)]
enum Number {
	Int(i64),
	Uint(u64),
	Float(f64),
}

impl Number {
	fn of(value: &Value) -> Option<Self> {
		if let Some(item) = value.as_i64() {
			return Some(Self::Int(item));
		}
		if let Some(item) = value.as_u64() {
			return Some(Self::Uint(item));
		}
		value.as_f64().map(Self::Float)
	}

	fn to_i64(self) -> i64 {
		match self {
			Self::Int(item) => item,
			Self::Uint(item) => item as i64,
			Self::Float(item) => item as i64,
		}
	}

	fn to_u64(self) -> u64 {
		match self {
			Self::Int(item) => item as u64,
			Self::Uint(item) => item,
			Self::Float(item) => item as u64,
		}
	}

	fn to_f64(self) -> f64 {
		match self {
			Self::Int(item) => item as f64,
			Self::Uint(item) => item as f64,
			Self::Float(item) => item,
		}
	}

	fn cast(self, to: &Type) -> Option<Value> {
		let value = match to {
			Type::I8 => Value::I8(self.to_i64() as i8),
			Type::I16 => Value::I16(self.to_i64() as i16),
			Type::I32 => Value::I32(self.to_i64() as i32),
			Type::I64 => Value::I64(self.to_i64()),
			Type::U8 => Value::U8(self.to_u64() as u8),
			Type::U16 => Value::U16(self.to_u64() as u16),
			Type::U32 => Value::U32(self.to_u64() as u32),
			Type::U64 => Value::U64(self.to_u64()),
			Type::F32 => Value::F32(self.to_f64() as f32),
			Type::F64 => Value::F64(self.to_f64()),
			_ => return None,
		};
		Some(value)
	}
}
