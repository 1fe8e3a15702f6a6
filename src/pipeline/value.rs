use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A type-erased value flowing between pipeline steps.
///
/// Cloning is cheap: the payload is shared, which is how parallel branches
/// all observe the same input.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Name of the concrete type stored in this value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Extracts an owned `T`, cloning only when the payload is still shared.
    ///
    /// Returns the value back unchanged when it does not hold a `T`.
    pub fn downcast<T>(self) -> Result<T, Value>
    where
        T: Any + Clone + Send + Sync,
    {
        let type_name = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(arc) => Ok(Arc::try_unwrap(arc).unwrap_or_else(|shared| (*shared).clone())),
            Err(inner) => Err(Value { inner, type_name }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Converts an optional erased value into `T`.
///
/// `None` is the "no value yet" sentinel and yields `T::default()`.
///
/// # Panics
///
/// Panics with `expected type <T>, got <actual>` when the value holds
/// another type. A mismatch is a wiring mistake in the pipeline, not a data
/// error, so it is never turned into a recoverable error.
pub fn assert_in<T>(input: Option<Value>) -> T
where
    T: Any + Clone + Default + Send + Sync,
{
    match input {
        None => T::default(),
        Some(value) => match value.downcast::<T>() {
            Ok(typed) => typed,
            Err(other) => panic!(
                "expected type {}, got {}",
                type_name::<T>(),
                other.type_name()
            ),
        },
    }
}
