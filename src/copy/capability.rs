use std::any::Any;
use std::fmt;

use crate::copy::{OpaqueType, ScanError, Value};

/// A value that may stand for "no value" next to a concrete payload.
///
/// The engine treats any type exposing this contract as nullable, whatever it
/// is called.
pub trait Nullable {
	/// Materialize the underlying value, or `None` for the absent state.
	fn value(&self) -> Option<Value>;
}

/// A value that can populate itself from an arbitrary input.
pub trait Scanner {
	/// Decode `src` into `self`. `None` is a null input.
	fn scan(&mut self, src: Option<&Value>) -> Result<(), ScanError>;
}

/// Object-safe plumbing for [`Opaque`] values.
///
/// Implemented automatically for every `Opaque + Clone + PartialEq + Default`
/// type.
pub trait OpaqueBase: Any + fmt::Debug + Send + Sync {
	/// Descriptor of the concrete type.
	fn opaque_type(&self) -> OpaqueType;
	/// Clone behind the trait object.
	fn clone_box(&self) -> Box<dyn Opaque>;
	/// Compare with another opaque value of possibly different type.
	fn eq_opaque(&self, other: &dyn Opaque) -> bool;
	/// Upcast for downcasting.
	fn as_any(&self) -> &dyn Any;
}

/// A leaf value type implemented outside the runtime type model.
///
/// Opaque values are copied whole. They join the nullable and custom-scan
/// paths by returning themselves from the capability hooks.
pub trait Opaque: OpaqueBase {
	/// Nullable capability, if the type has one.
	fn as_nullable(&self) -> Option<&dyn Nullable> {
		None
	}

	/// Custom-scan capability, if the type has one.
	fn as_scanner(&mut self) -> Option<&mut dyn Scanner> {
		None
	}
}

impl<T> OpaqueBase for T
where
	T: Opaque + Clone + PartialEq + Default,
{
	fn opaque_type(&self) -> OpaqueType {
		OpaqueType::of::<T>()
	}

	fn clone_box(&self) -> Box<dyn Opaque> {
		Box::new(self.clone())
	}

	fn eq_opaque(&self, other: &dyn Opaque) -> bool {
		other.as_any().downcast_ref::<T>().is_some_and(|other| other == self)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

impl dyn Opaque {
	/// Borrow the concrete value when it is a `T`.
	pub fn downcast_ref<T: Opaque>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}
}

impl Clone for Box<dyn Opaque> {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

impl PartialEq for Box<dyn Opaque> {
	fn eq(&self, other: &Self) -> bool {
		self.eq_opaque(other.as_ref())
	}
}
