use std::sync::Arc;

use crate::copy::indirect::{indirect, indirect_alloc};
use crate::copy::{Nullable, Opaque, ScanError, Scanner, StructType, Type};

/// Runtime value paired with its type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Boolean.
	Bool(bool),
	/// Signed 8-bit integer.
	I8(i8),
	/// Signed 16-bit integer.
	I16(i16),
	/// Signed 32-bit integer.
	I32(i32),
	/// Signed 64-bit integer.
	I64(i64),
	/// Unsigned 8-bit integer.
	U8(u8),
	/// Unsigned 16-bit integer.
	U16(u16),
	/// Unsigned 32-bit integer.
	U32(u32),
	/// Unsigned 64-bit integer.
	U64(u64),
	/// 32-bit float.
	F32(f32),
	/// 64-bit float.
	F64(f64),
	/// UTF-8 string.
	String(String),
	/// Raw byte string.
	Bytes(Vec<u8>),
	/// Nullable owned reference.
	Ref(RefValue),
	/// Sequence of values.
	Seq(SeqValue),
	/// Struct instance.
	Struct(StructValue),
	/// Leaf value implemented outside the model.
	Opaque(Box<dyn Opaque>),
}

/// Nullable reference with its declared target type.
#[derive(Debug, Clone, PartialEq)]
pub struct RefValue {
	/// Referenced type, kept so null references stay typed.
	pub elem: Type,
	/// Owned target; `None` is the null reference.
	pub target: Option<Box<Value>>,
}

/// Sequence with its declared element type.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqValue {
	/// Element type.
	pub elem: Type,
	/// Elements in order.
	pub items: Vec<Value>,
}

/// Struct instance; `fields` follow the declaration order of `ty`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// Instance type.
	pub ty: Arc<StructType>,
	/// Field values in declaration order.
	pub fields: Vec<Value>,
}

impl Value {
	/// Reference owning `target`.
	pub fn reference(target: Value) -> Self {
		Self::Ref(RefValue {
			elem: target.ty(),
			target: Some(Box::new(target)),
		})
	}

	/// Null reference to `elem`.
	pub fn null(elem: Type) -> Self {
		Self::Ref(RefValue { elem, target: None })
	}

	/// Sequence of `elem`.
	pub fn seq(elem: Type, items: Vec<Value>) -> Self {
		Self::Seq(SeqValue { elem, items })
	}

	/// Type of this value.
	pub fn ty(&self) -> Type {
		match self {
			Self::Bool(_) => Type::Bool,
			Self::I8(_) => Type::I8,
			Self::I16(_) => Type::I16,
			Self::I32(_) => Type::I32,
			Self::I64(_) => Type::I64,
			Self::U8(_) => Type::U8,
			Self::U16(_) => Type::U16,
			Self::U32(_) => Type::U32,
			Self::U64(_) => Type::U64,
			Self::F32(_) => Type::F32,
			Self::F64(_) => Type::F64,
			Self::String(_) => Type::String,
			Self::Bytes(_) => Type::Bytes,
			Self::Ref(item) => Type::reference(item.elem.clone()),
			Self::Seq(item) => Type::seq(item.elem.clone()),
			Self::Struct(item) => Type::Struct(Arc::clone(&item.ty)),
			Self::Opaque(item) => Type::Opaque(item.opaque_type()),
		}
	}

	/// Follow references to the first non-reference value; `None` on a null link.
	pub fn indirect(&self) -> Option<&Value> {
		indirect(self)
	}

	/// Whether this is a reference with no target anywhere along its chain.
	pub fn is_null(&self) -> bool {
		indirect(self).is_none()
	}

	/// String payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(item) => Some(item),
			_ => None,
		}
	}

	/// Byte payload.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Bytes(item) => Some(item),
			_ => None,
		}
	}

	/// Boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(item) => Some(*item),
			_ => None,
		}
	}

	/// Signed integer payload of any width.
	pub fn as_i64(&self) -> Option<i64> {
		match *self {
			Self::I8(item) => Some(i64::from(item)),
			Self::I16(item) => Some(i64::from(item)),
			Self::I32(item) => Some(i64::from(item)),
			Self::I64(item) => Some(item),
			_ => None,
		}
	}

	/// Unsigned integer payload of any width.
	pub fn as_u64(&self) -> Option<u64> {
		match *self {
			Self::U8(item) => Some(u64::from(item)),
			Self::U16(item) => Some(u64::from(item)),
			Self::U32(item) => Some(u64::from(item)),
			Self::U64(item) => Some(item),
			_ => None,
		}
	}

	/// Float payload of either width.
	pub fn as_f64(&self) -> Option<f64> {
		match *self {
			Self::F32(item) => Some(f64::from(item)),
			Self::F64(item) => Some(item),
			_ => None,
		}
	}

	/// Struct payload.
	pub fn as_struct(&self) -> Option<&StructValue> {
		match self {
			Self::Struct(item) => Some(item),
			_ => None,
		}
	}

	/// Sequence payload.
	pub fn as_seq(&self) -> Option<&SeqValue> {
		match self {
			Self::Seq(item) => Some(item),
			_ => None,
		}
	}

	/// Opaque payload.
	pub fn as_opaque(&self) -> Option<&(dyn Opaque + 'static)> {
		match self {
			Self::Opaque(item) => Some(item.as_ref()),
			_ => None,
		}
	}

	/// Nullable capability of this value, if its type has one.
	pub fn as_nullable(&self) -> Option<&dyn Nullable> {
		match self {
			Self::Opaque(item) => item.as_nullable(),
			Self::Struct(item) if item.ty.is_nullable() => Some(item),
			_ => None,
		}
	}

	/// Custom-scan capability of this value, if its type has one.
	pub fn as_scanner(&mut self) -> Option<&mut dyn Scanner> {
		match self {
			Self::Opaque(item) => item.as_scanner(),
			Self::Struct(item) if item.ty.is_scanner() => Some(item),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::I32(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::I64(value)
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Self::U64(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::F64(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<StructValue> for Value {
	fn from(value: StructValue) -> Self {
		Self::Struct(value)
	}
}

impl StructValue {
	/// Instance of `ty` with every field at its zero value.
	pub fn zero(ty: &Arc<StructType>) -> Self {
		Self {
			ty: Arc::clone(ty),
			fields: ty.fields().iter().map(|field| field.ty.zero()).collect(),
		}
	}

	/// Field by name, including promoted fields. `None` when unknown or behind a null embedded reference.
	pub fn get(&self, name: &str) -> Option<&Value> {
		let field = self.ty.field_by_name(name)?;
		self.at_path(&field.path)
	}

	/// Mutable field by name, allocating null embedded references on the way.
	pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
		let path = self.ty.field_by_name(name)?.path.clone();
		self.at_path_mut(&path)
	}

	/// Builder-style field assignment; unknown names are ignored.
	pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
		if let Some(slot) = self.get_mut(name) {
			*slot = value.into();
		}
		self
	}

	pub(crate) fn at_path(&self, path: &[usize]) -> Option<&Value> {
		let (first, rest) = path.split_first()?;
		let field = self.fields.get(*first)?;
		if rest.is_empty() {
			return Some(field);
		}
		match indirect(field)? {
			Value::Struct(inner) => inner.at_path(rest),
			_ => None,
		}
	}

	pub(crate) fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Value> {
		let (first, rest) = path.split_first()?;
		let field = self.fields.get_mut(*first)?;
		if rest.is_empty() {
			return Some(field);
		}
		match indirect_alloc(field) {
			Value::Struct(inner) => inner.at_path_mut(rest),
			_ => None,
		}
	}

	/// Receiver for a method found at `path` (see [`FlatMethod`](crate::copy::FlatMethod)).
	pub(crate) fn receiver(&self, path: &[usize]) -> Option<&StructValue> {
		if path.is_empty() {
			return Some(self);
		}
		indirect(self.at_path(path)?)?.as_struct()
	}

	pub(crate) fn receiver_mut(&mut self, path: &[usize]) -> Option<&mut StructValue> {
		if path.is_empty() {
			return Some(self);
		}
		match indirect_alloc(self.at_path_mut(path)?) {
			Value::Struct(inner) => Some(inner),
			_ => None,
		}
	}
}

impl Nullable for StructValue {
	fn value(&self) -> Option<Value> {
		self.ty.nullable().and_then(|hook| hook(self))
	}
}

impl Scanner for StructValue {
	fn scan(&mut self, src: Option<&Value>) -> Result<(), ScanError> {
		let Some(hook) = self.ty.scanner().cloned() else {
			return Err(ScanError::new(format!("{} has no scanner", self.ty.name())));
		};
		hook(self, src)
	}
}
