use crystal_sim_core::CrystalSimulation;
use std::ffi::CString;

use crate::error::{
    with_last_error_mut, CrystalSimError, CrystalSimErrorCode, DefaultCrystalSimError,
};
use crate::instance::CrystalSimInstance;

/// Set the thread-local error message and code.
/// Accepts any type implementing `CrystalSimError`.
pub(crate) fn set_last_error(error: &impl CrystalSimError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record `error` and return its code.
#[inline]
pub(crate) fn track_error(error: &impl CrystalSimError) -> CrystalSimErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = CrystalSimErrorCode::Ok;
    });
}

/// Map a result onto an error code, recording failures and clearing on success.
pub(crate) fn track_result<T>(result: Result<T, DefaultCrystalSimError>) -> Result<T, CrystalSimErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run `f` and collapse its result into a status code.
pub(crate) fn handle_ffi_result_error<F>(f: F) -> CrystalSimErrorCode
where
    F: FnOnce() -> Result<(), DefaultCrystalSimError>,
{
    match track_result(f()) {
        Ok(()) => CrystalSimErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind a raw pointer.
///
/// The pointer must be null or come from `crystal_sim_new` and not yet be destroyed.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const CrystalSimInstance,
) -> Result<&'a CrystalSimInstance, DefaultCrystalSimError> {
    // SAFETY: null is rejected; any other pointer is required by contract to be live.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultCrystalSimError::null_pointer("ptr"))
}

/// Run `f` under the read lock.
pub(crate) fn with_crystal_sim<F, T>(
    instance: &CrystalSimInstance,
    f: F,
) -> Result<T, DefaultCrystalSimError>
where
    F: FnOnce(&CrystalSimulation) -> T,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultCrystalSimError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` under the write lock.
pub(crate) fn with_crystal_sim_mut<F, T>(
    instance: &CrystalSimInstance,
    f: F,
) -> Result<T, DefaultCrystalSimError>
where
    F: FnOnce(&mut CrystalSimulation) -> T,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultCrystalSimError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}
