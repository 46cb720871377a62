use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use crystal_sim_core::ConfigError;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait CrystalSimError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> CrystalSimErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `CrystalSimError` for the FFI failure cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultCrystalSimError {
    code: CrystalSimErrorCode,
    msg: String,
}

impl DefaultCrystalSimError {
    /// Null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: CrystalSimErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Lock poisoned by a panic in another thread.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: CrystalSimErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Configuration rejected by validation.
    pub fn invalid_config(error: &ConfigError) -> Self {
        Self {
            code: CrystalSimErrorCode::InvalidConfig,
            msg: format!("Invalid configuration: {error}"),
        }
    }

    /// Caller-provided buffer shorter than the data to copy.
    pub fn buffer_too_small(param_name: &str, required: usize, provided: usize) -> Self {
        Self::invalid_parameter(format!(
            "Buffer '{param_name}' holds {provided} elements, {required} required"
        ))
    }

    /// Invalid parameter with a custom message.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: CrystalSimErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl CrystalSimError for DefaultCrystalSimError {
    fn code(&self) -> CrystalSimErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by crystal simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalSimErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Null pointer passed where non-null required.
    NullPointer = 1,

    /// Internal lock was poisoned by a panic.
    LockPoisoned = 2,

    /// Configuration failed validation (grid extent, spacing, time step,
    /// model constants, nucleus radius, sub-step count, or screen reference size).
    InvalidConfig = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` is owned here so pointers handed out stay valid.
    static LAST_ERROR: RefCell<(Option<CString>, CrystalSimErrorCode)> = const { RefCell::new((None, CrystalSimErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, CrystalSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, CrystalSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// CrystalSimInstance* sim = nullptr;
/// CrystalSimConfig config = crystal_sim_default_config(250, 250, 0);
/// if (crystal_sim_new(&config, &sim) != CrystalSimErrorCode::Ok) {
///     const char* error = crystal_sim_get_last_error();
///     if (error) {
///         printf("Crystal sim creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn crystal_sim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `CrystalSimErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn crystal_sim_get_last_error_code() -> CrystalSimErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
