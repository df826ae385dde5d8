/// Common interface for mutex implementations.
///
/// `mcp23xxx` keeps the register driver of a device inside a mutex so that a read-modify-write
/// cycle can never interleave with another register access to the same chip.  This trait is
/// already implemented for a number of existing mutex types:
///
/// | Mutex | Feature Name | Notes |
/// | --- | --- | --- |
/// | [`core::cell::RefCell`] | _always available_ | For sharing within a single execution context. |
/// | [`std::sync::Mutex`][mutex-std] | `std` | For platforms where `std` is available. |
/// | [`critical_section::Mutex`][mutex-cs] | `critical-section` | Around a `RefCell`, for sharing with interrupt handlers. |
///
/// [mutex-std]: https://doc.rust-lang.org/std/sync/struct.Mutex.html
/// [mutex-cs]: https://docs.rs/critical-section/latest/critical_section/struct.Mutex.html
///
/// For other mutex types, a custom implementation is needed.  Due to the orphan rule, it might be
/// necessary to wrap it in a newtype.  As an example, this is what such a custom implementation
/// might look like:
///
/// ```
/// struct MyMutex<T>(std::sync::Mutex<T>);
///
/// impl<T> mcp23xxx::DeviceMutex for MyMutex<T> {
///     type Device = T;
///
///     fn create(v: T) -> Self {
///         Self(std::sync::Mutex::new(v))
///     }
///
///     fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R {
///         let mut v = self.0.lock().unwrap();
///         f(&mut v)
///     }
///
///     fn into_inner(self) -> T {
///         self.0.into_inner().unwrap()
///     }
/// }
/// ```
pub trait DeviceMutex {
    /// The register driver that is wrapped inside this mutex.
    type Device;

    /// Create a new mutex of this type.
    fn create(v: Self::Device) -> Self;

    /// Lock the mutex and give a closure access to the driver inside.
    fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R;

    /// Destroy the mutex and return the driver inside.
    fn into_inner(self) -> Self::Device;
}

impl<T> DeviceMutex for core::cell::RefCell<T> {
    type Device = T;

    fn create(v: Self::Device) -> Self {
        core::cell::RefCell::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R {
        let mut v = self.borrow_mut();
        f(&mut v)
    }

    fn into_inner(self) -> Self::Device {
        core::cell::RefCell::into_inner(self)
    }
}

#[cfg(any(test, feature = "std"))]
impl<T> DeviceMutex for std::sync::Mutex<T> {
    type Device = T;

    fn create(v: Self::Device) -> Self {
        std::sync::Mutex::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R {
        // Bank mode is only updated after a successful write, so a poisoned driver is consistent.
        let mut v = std::sync::Mutex::lock(self).unwrap_or_else(|e| e.into_inner());
        f(&mut v)
    }

    fn into_inner(self) -> Self::Device {
        std::sync::Mutex::into_inner(self).unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(feature = "critical-section")]
impl<T> DeviceMutex for critical_section::Mutex<core::cell::RefCell<T>> {
    type Device = T;

    fn create(v: Self::Device) -> Self {
        critical_section::Mutex::new(core::cell::RefCell::new(v))
    }

    fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R {
        critical_section::with(|cs| {
            let mut v = self.borrow_ref_mut(cs);
            f(&mut v)
        })
    }

    fn into_inner(self) -> Self::Device {
        critical_section::Mutex::into_inner(self).into_inner()
    }
}
