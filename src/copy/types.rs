use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::copy::{FlatMethod, Method, Opaque, ScanError, StructValue, Value};

/// Nullable hook for struct-shaped wrappers.
pub type NullableFn = Arc<dyn Fn(&StructValue) -> Option<Value> + Send + Sync>;

/// Custom-scan hook for struct-shaped types.
pub type ScanFn = Arc<dyn Fn(&mut StructValue, Option<&Value>) -> Result<(), ScanError> + Send + Sync>;

/// Runtime type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
	/// Boolean.
	Bool,
	/// Signed 8-bit integer.
	I8,
	/// Signed 16-bit integer.
	I16,
	/// Signed 32-bit integer.
	I32,
	/// Signed 64-bit integer.
	I64,
	/// Unsigned 8-bit integer.
	U8,
	/// Unsigned 16-bit integer.
	U16,
	/// Unsigned 32-bit integer.
	U32,
	/// Unsigned 64-bit integer.
	U64,
	/// 32-bit float.
	F32,
	/// 64-bit float.
	F64,
	/// UTF-8 string.
	String,
	/// Raw byte string.
	Bytes,
	/// Nullable reference to a value of the inner type.
	Ref(Box<Type>),
	/// Growable sequence of the inner type.
	Seq(Box<Type>),
	/// Named record type.
	Struct(Arc<StructType>),
	/// Leaf type implemented outside the model.
	Opaque(OpaqueType),
}

impl Type {
	/// Reference to `inner`.
	pub fn reference(inner: Type) -> Self {
		Self::Ref(Box::new(inner))
	}

	/// Sequence of `inner`.
	pub fn seq(inner: Type) -> Self {
		Self::Seq(Box::new(inner))
	}

	/// Opaque descriptor for `T`.
	pub fn opaque<T: Opaque + Default>() -> Self {
		Self::Opaque(OpaqueType::of::<T>())
	}

	/// Strip every level of reference and sequence.
	pub fn base(&self) -> &Type {
		match self {
			Self::Ref(inner) | Self::Seq(inner) => inner.base(),
			other => other,
		}
	}

	/// Strip every level of reference.
	pub fn innermost(&self) -> &Type {
		match self {
			Self::Ref(inner) => inner.innermost(),
			other => other,
		}
	}

	/// Whether this is a reference type.
	pub fn is_ref(&self) -> bool {
		matches!(self, Self::Ref(_))
	}

	/// Whether this is a struct type.
	pub fn is_struct(&self) -> bool {
		matches!(self, Self::Struct(_))
	}

	/// Whether this is an integer or float type.
	pub fn is_numeric(&self) -> bool {
		matches!(
			self,
			Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::F32 | Self::F64
		)
	}

	/// Whether values of this type carry the nullable capability.
	pub fn is_nullable(&self) -> bool {
		match self {
			Self::Struct(item) => item.is_nullable(),
			Self::Opaque(item) => item.is_nullable(),
			_ => false,
		}
	}

	/// Struct descriptor when this is a struct type.
	pub fn as_struct(&self) -> Option<&Arc<StructType>> {
		match self {
			Self::Struct(item) => Some(item),
			_ => None,
		}
	}

	/// Zero value of this type.
	pub fn zero(&self) -> Value {
		match self {
			Self::Bool => Value::Bool(false),
			Self::I8 => Value::I8(0),
			Self::I16 => Value::I16(0),
			Self::I32 => Value::I32(0),
			Self::I64 => Value::I64(0),
			Self::U8 => Value::U8(0),
			Self::U16 => Value::U16(0),
			Self::U32 => Value::U32(0),
			Self::U64 => Value::U64(0),
			Self::F32 => Value::F32(0.0),
			Self::F64 => Value::F64(0.0),
			Self::String => Value::String(String::new()),
			Self::Bytes => Value::Bytes(Vec::new()),
			Self::Ref(inner) => Value::null((**inner).clone()),
			Self::Seq(inner) => Value::seq((**inner).clone(), Vec::new()),
			Self::Struct(item) => Value::Struct(StructValue::zero(item)),
			Self::Opaque(item) => Value::Opaque(item.zero()),
		}
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool => f.write_str("bool"),
			Self::I8 => f.write_str("i8"),
			Self::I16 => f.write_str("i16"),
			Self::I32 => f.write_str("i32"),
			Self::I64 => f.write_str("i64"),
			Self::U8 => f.write_str("u8"),
			Self::U16 => f.write_str("u16"),
			Self::U32 => f.write_str("u32"),
			Self::U64 => f.write_str("u64"),
			Self::F32 => f.write_str("f32"),
			Self::F64 => f.write_str("f64"),
			Self::String => f.write_str("string"),
			Self::Bytes => f.write_str("bytes"),
			Self::Ref(inner) => write!(f, "*{inner}"),
			Self::Seq(inner) => write!(f, "[]{inner}"),
			Self::Struct(item) => f.write_str(item.name()),
			Self::Opaque(item) => f.write_str(item.name()),
		}
	}
}

/// Descriptor of an [`Opaque`] Rust type.
#[derive(Clone, Copy)]
pub struct OpaqueType {
	id: TypeId,
	name: &'static str,
	zero: fn() -> Box<dyn Opaque>,
	nullable: bool,
}

impl OpaqueType {
	/// Descriptor for `T`.
	pub fn of<T: Opaque + Default>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: short_type_name(std::any::type_name::<T>()),
			zero: zero_opaque::<T>,
			nullable: T::default().as_nullable().is_some(),
		}
	}

	/// Unqualified Rust type name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Whether instances expose the nullable capability.
	pub fn is_nullable(&self) -> bool {
		self.nullable
	}

	/// Fresh default instance.
	pub fn zero(&self) -> Box<dyn Opaque> {
		(self.zero)()
	}
}

impl PartialEq for OpaqueType {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl fmt::Debug for OpaqueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("OpaqueType").field(&self.name).finish()
	}
}

fn zero_opaque<T: Opaque + Default>() -> Box<dyn Opaque> {
	Box::new(T::default())
}

fn short_type_name(full: &'static str) -> &'static str {
	let head = full.split('<').next().unwrap_or(full);
	head.rsplit("::").next().unwrap_or(head)
}

/// One declared struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
	/// Field name as used for matching.
	pub name: Box<str>,
	/// Declared type.
	pub ty: Type,
	/// Whether the engine may write this field.
	pub settable: bool,
	/// Whether the field embeds another struct whose members are promoted.
	pub embedded: bool,
}

/// One entry of a flattened field list.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField {
	/// Field name.
	pub name: Box<str>,
	/// Declared type.
	pub ty: Type,
	/// Whether the engine may write this field.
	pub settable: bool,
	/// Field indices from the outer struct down through embedded structs.
	pub path: Vec<usize>,
}

impl FlatField {
	/// Embedding depth; `0` for directly declared fields.
	pub fn depth(&self) -> usize {
		self.path.len().saturating_sub(1)
	}
}

/// Struct declaration with flattened field and method tables.
pub struct StructType {
	name: Box<str>,
	fields: Vec<FieldDef>,
	flat_fields: Vec<FlatField>,
	flat_methods: Vec<FlatMethod>,
	nullable: Option<NullableFn>,
	scanner: Option<ScanFn>,
}

impl StructType {
	/// Start declaring a struct type.
	pub fn builder(name: &str) -> StructBuilder {
		StructBuilder {
			name: name.into(),
			fields: Vec::new(),
			methods: Vec::new(),
			nullable: None,
			scanner: None,
		}
	}

	/// Type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Directly declared fields in source order.
	pub fn fields(&self) -> &[FieldDef] {
		&self.fields
	}

	/// Fields with embedded members inlined depth-first.
	pub fn flat_fields(&self) -> &[FlatField] {
		&self.flat_fields
	}

	/// Methods including those promoted from embedded structs.
	pub fn flat_methods(&self) -> &[FlatMethod] {
		&self.flat_methods
	}

	/// Resolve a field by name, preferring the shallowest declaration.
	pub fn field_by_name(&self, name: &str) -> Option<&FlatField> {
		shallowest(self.flat_fields.iter().filter(|field| field.name.as_ref() == name), FlatField::depth)
	}

	/// Resolve a method by name, preferring the shallowest declaration.
	pub fn method_by_name(&self, name: &str) -> Option<&FlatMethod> {
		shallowest(self.flat_methods.iter().filter(|item| item.method.name() == name), |item| item.path.len())
	}

	/// Nullable hook, when declared.
	pub fn nullable(&self) -> Option<&NullableFn> {
		self.nullable.as_ref()
	}

	/// Custom-scan hook, when declared.
	pub fn scanner(&self) -> Option<&ScanFn> {
		self.scanner.as_ref()
	}

	/// Whether instances unwrap through the nullable hook.
	pub fn is_nullable(&self) -> bool {
		self.nullable.is_some()
	}

	/// Whether instances populate themselves through the scan hook.
	pub fn is_scanner(&self) -> bool {
		self.scanner.is_some()
	}

	/// Whether both types declare the same field sequence.
	pub fn same_layout(&self, other: &StructType) -> bool {
		self.fields == other.fields
	}
}

fn shallowest<'a, T>(items: impl Iterator<Item = &'a T>, depth: impl Fn(&T) -> usize) -> Option<&'a T> {
	let mut best: Option<&'a T> = None;
	for item in items {
		if best.is_none_or(|current| depth(item) < depth(current)) {
			best = Some(item);
		}
	}
	best
}

/// Same name, same fields, and the same nullable and scan hooks.
impl PartialEq for StructType {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
			&& self.fields == other.fields
			&& same_hook(&self.nullable, &other.nullable)
			&& same_hook(&self.scanner, &other.scanner)
	}
}

fn same_hook<F: ?Sized>(a: &Option<Arc<F>>, b: &Option<Arc<F>>) -> bool {
	match (a, b) {
		(Some(a), Some(b)) => Arc::ptr_eq(a, b),
		(None, None) => true,
		_ => false,
	}
}

impl fmt::Debug for StructType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StructType")
			.field("name", &self.name)
			.field("fields", &self.fields)
			.field("methods", &self.flat_methods.len())
			.finish()
	}
}

/// Incremental [`StructType`] declaration.
pub struct StructBuilder {
	name: Box<str>,
	fields: Vec<FieldDef>,
	methods: Vec<Method>,
	nullable: Option<NullableFn>,
	scanner: Option<ScanFn>,
}

impl StructBuilder {
	/// Declare a settable field.
	pub fn field(mut self, name: &str, ty: Type) -> Self {
		self.fields.push(FieldDef {
			name: name.into(),
			ty,
			settable: true,
			embedded: false,
		});
		self
	}

	/// Declare a field the engine reads but never writes.
	pub fn private_field(mut self, name: &str, ty: Type) -> Self {
		self.fields.push(FieldDef {
			name: name.into(),
			ty,
			settable: false,
			embedded: false,
		});
		self
	}

	/// Embed `inner` by value; its fields and methods are promoted.
	pub fn embed(mut self, inner: &Arc<StructType>) -> Self {
		self.fields.push(FieldDef {
			name: inner.name.clone(),
			ty: Type::Struct(Arc::clone(inner)),
			settable: true,
			embedded: true,
		});
		self
	}

	/// Embed `inner` behind a reference; its fields and methods are promoted.
	pub fn embed_ref(mut self, inner: &Arc<StructType>) -> Self {
		self.fields.push(FieldDef {
			name: inner.name.clone(),
			ty: Type::reference(Type::Struct(Arc::clone(inner))),
			settable: true,
			embedded: true,
		});
		self
	}

	/// Attach a method.
	pub fn method(mut self, method: Method) -> Self {
		self.methods.push(method);
		self
	}

	/// Attach an accessor: no arguments, one result, read-only receiver.
	pub fn getter<F>(self, name: &str, ret: Type, f: F) -> Self
	where
		F: Fn(&StructValue) -> Value + Send + Sync + 'static,
	{
		self.method(Method::shared(name, Vec::new(), vec![ret], move |this, _| vec![f(this)]))
	}

	/// Attach a one-argument method that mutates the receiver.
	pub fn setter<F>(self, name: &str, param: Type, f: F) -> Self
	where
		F: Fn(&mut StructValue, &Value) + Send + Sync + 'static,
	{
		self.method(Method::exclusive(name, vec![param], Vec::new(), move |this, args| {
			if let Some(arg) = args.first() {
				f(this, arg);
			}
			Vec::new()
		}))
	}

	/// Declare the nullable capability.
	pub fn nullable<F>(mut self, f: F) -> Self
	where
		F: Fn(&StructValue) -> Option<Value> + Send + Sync + 'static,
	{
		self.nullable = Some(Arc::new(f));
		self
	}

	/// Declare the custom-scan capability.
	pub fn scanner<F>(mut self, f: F) -> Self
	where
		F: Fn(&mut StructValue, Option<&Value>) -> Result<(), ScanError> + Send + Sync + 'static,
	{
		self.scanner = Some(Arc::new(f));
		self
	}

	/// Finish the declaration, flattening embedded members.
	pub fn build(self) -> Arc<StructType> {
		let mut flat_fields = Vec::new();
		let mut flat_methods: Vec<FlatMethod> = self
			.methods
			.into_iter()
			.map(|method| FlatMethod { path: Vec::new(), method })
			.collect();

		for (idx, field) in self.fields.iter().enumerate() {
			let inner = field.ty.innermost().as_struct().filter(|_| field.embedded);
			let Some(inner) = inner else {
				flat_fields.push(FlatField {
					name: field.name.clone(),
					ty: field.ty.clone(),
					settable: field.settable,
					path: vec![idx],
				});
				continue;
			};

			for promoted in inner.flat_fields() {
				let mut path = Vec::with_capacity(promoted.path.len() + 1);
				path.push(idx);
				path.extend_from_slice(&promoted.path);
				flat_fields.push(FlatField { path, ..promoted.clone() });
			}
			for promoted in inner.flat_methods() {
				let mut path = Vec::with_capacity(promoted.path.len() + 1);
				path.push(idx);
				path.extend_from_slice(&promoted.path);
				flat_methods.push(FlatMethod {
					path,
					method: promoted.method.clone(),
				});
			}
		}

		Arc::new(StructType {
			name: self.name,
			fields: self.fields,
			flat_fields,
			flat_methods,
			nullable: self.nullable,
			scanner: self.scanner,
		})
	}
}
