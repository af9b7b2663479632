//! Binding to the transit shared library.
//!
//! Every exported function takes NUL-terminated JSON and a caller-owned error
//! buffer. The library copies at most [`ERROR_LEN`] bytes of its error message
//! into that buffer with `strncpy`, so the buffer is allocated one byte larger
//! and zeroed to guarantee termination. Returned strings are `malloc`ed by the
//! library and released here with `free` once copied.

use std::ffi::{CStr, CString, c_char};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use parking_lot::Mutex;

use crate::backend::{Operation, TransitBackend};
use crate::error::{Result, TransitError};

/// Maximum error message length the library writes.
pub const ERROR_LEN: usize = 250;

// cgo exports Go `bool` as a one-byte unsigned integer.
type InputStatusFn = unsafe extern "C" fn(*const c_char, *mut c_char) -> u8;
type StatusFn = unsafe extern "C" fn(*mut c_char) -> u8;
type OutputFn = unsafe extern "C" fn(*mut c_char) -> *mut c_char;
type InputOutputFn = unsafe extern "C" fn(*const c_char, *mut c_char) -> *mut c_char;

/// Resolved entry points. Only valid while the owning [`Library`] is loaded.
struct Symbols {
    connect: InputStatusFn,
    disconnect: StatusFn,
    send_resources_with_metrics: InputStatusFn,
    list_metrics: OutputFn,
    synchronize_inventory: InputStatusFn,
    test_monitored_resource: InputOutputFn,
}

impl Symbols {
    /// # Safety
    /// The library must export each symbol with the signature given above.
    unsafe fn resolve(library: &Library) -> Result<Self> {
        unsafe {
            Ok(Self {
                connect: symbol(library, Operation::Connect)?,
                disconnect: symbol(library, Operation::Disconnect)?,
                send_resources_with_metrics: symbol(library, Operation::SendResourcesWithMetrics)?,
                list_metrics: symbol(library, Operation::ListMetrics)?,
                synchronize_inventory: symbol(library, Operation::SynchronizeInventory)?,
                test_monitored_resource: symbol(library, Operation::TestMonitoredResource)?,
            })
        }
    }
}

unsafe fn symbol<T: Copy>(library: &Library, operation: Operation) -> Result<T> {
    let name = format!("{}\0", operation.symbol());
    let sym: Symbol<'_, T> = unsafe { library.get(name.as_bytes()) }
        .map_err(|e| TransitError::Library(format!("symbol {}: {}", operation, e)))?;
    Ok(*sym)
}

/// Zeroed, per-call error buffer.
pub(crate) struct ErrorBuffer([u8; ERROR_LEN + 1]);

impl ErrorBuffer {
    pub(crate) fn new() -> Self {
        Self([0; ERROR_LEN + 1])
    }

    fn as_mut_ptr(&mut self) -> *mut c_char {
        self.0.as_mut_ptr().cast()
    }

    /// Message up to the first NUL, lossily decoded and kept verbatim.
    pub(crate) fn message(&self) -> String {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len());
        if end == 0 {
            return "no error message provided".to_string();
        }
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

fn to_cstring(operation: Operation, input: &str) -> Result<CString> {
    CString::new(input).map_err(|_| TransitError::invalid_string(operation.symbol()))
}

/// Copy a library-owned string and release it.
///
/// # Safety
/// `ptr` must be non-null, NUL-terminated and allocated with `malloc`.
unsafe fn take_string(operation: Operation, ptr: *mut c_char) -> Result<String> {
    let owned = unsafe { CStr::from_ptr(ptr) }.to_str().map(str::to_owned);
    unsafe { libc::free(ptr.cast()) };
    owned.map_err(|_| TransitError::invalid_string(operation.symbol()))
}

/// A loaded transit library.
///
/// Calls are serialized because the library keeps its connection in global
/// state. Each call has its own error buffer.
pub struct NativeLibrary {
    path: PathBuf,
    symbols: Symbols,
    lock: Mutex<()>,
    // Must outlive `symbols`.
    _library: Library,
}

impl NativeLibrary {
    /// Platform file name of the library (`libtransit.so`, `transit.dll`, ...).
    pub fn default_path() -> PathBuf {
        PathBuf::from(libloading::library_filename("transit"))
    }

    /// Load the library and resolve every exported function.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // SAFETY: loading runs the library's initializers, which start its
        // transport. Nothing else is required of the caller.
        let library = unsafe { Library::new(path) }
            .map_err(|e| TransitError::Library(format!("{}: {}", path.display(), e)))?;

        // SAFETY: the signatures match the library's cgo exports.
        let symbols = unsafe { Symbols::resolve(&library)? };

        tracing::info!(path = %path.display(), "Loaded transit library");

        Ok(Self {
            path: path.to_path_buf(),
            symbols,
            lock: Mutex::new(()),
            _library: library,
        })
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn call_with_input(&self, operation: Operation, f: InputStatusFn, input: &str) -> Result<()> {
        let input = to_cstring(operation, input)?;
        let mut error = ErrorBuffer::new();

        let status = {
            let _guard = self.lock.lock();
            tracing::trace!(%operation, bytes = input.as_bytes().len(), "Native call");
            // SAFETY: both pointers stay valid for the call and the library
            // writes at most ERROR_LEN bytes into the buffer.
            unsafe { f(input.as_ptr(), error.as_mut_ptr()) }
        };

        if status != 0 {
            Ok(())
        } else {
            Err(TransitError::native(operation.symbol(), error.message()))
        }
    }

    fn call_status(&self, operation: Operation, f: StatusFn) -> Result<()> {
        let mut error = ErrorBuffer::new();

        let status = {
            let _guard = self.lock.lock();
            tracing::trace!(%operation, "Native call");
            // SAFETY: see call_with_input.
            unsafe { f(error.as_mut_ptr()) }
        };

        if status != 0 {
            Ok(())
        } else {
            Err(TransitError::native(operation.symbol(), error.message()))
        }
    }

    fn call_output(&self, operation: Operation, f: OutputFn) -> Result<String> {
        let mut error = ErrorBuffer::new();

        let ptr = {
            let _guard = self.lock.lock();
            tracing::trace!(%operation, "Native call");
            // SAFETY: see call_with_input.
            unsafe { f(error.as_mut_ptr()) }
        };

        if ptr.is_null() {
            return Err(TransitError::native(operation.symbol(), error.message()));
        }
        // SAFETY: non-null results are C strings from C.CString (malloc).
        unsafe { take_string(operation, ptr) }
    }

    fn call_input_output(&self, operation: Operation, f: InputOutputFn, input: &str) -> Result<String> {
        let input = to_cstring(operation, input)?;
        let mut error = ErrorBuffer::new();

        let ptr = {
            let _guard = self.lock.lock();
            tracing::trace!(%operation, bytes = input.as_bytes().len(), "Native call");
            // SAFETY: see call_with_input.
            unsafe { f(input.as_ptr(), error.as_mut_ptr()) }
        };

        if ptr.is_null() {
            return Err(TransitError::native(operation.symbol(), error.message()));
        }
        // SAFETY: see call_output.
        unsafe { take_string(operation, ptr) }
    }
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl TransitBackend for NativeLibrary {
    fn connect(&self, credentials_json: &str) -> Result<()> {
        self.call_with_input(Operation::Connect, self.symbols.connect, credentials_json)
    }

    fn disconnect(&self) -> Result<()> {
        self.call_status(Operation::Disconnect, self.symbols.disconnect)
    }

    fn send_resources_with_metrics(&self, resources_json: &str) -> Result<()> {
        self.call_with_input(
            Operation::SendResourcesWithMetrics,
            self.symbols.send_resources_with_metrics,
            resources_json,
        )
    }

    fn list_metrics(&self) -> Result<String> {
        self.call_output(Operation::ListMetrics, self.symbols.list_metrics)
    }

    fn synchronize_inventory(&self, inventory_json: &str) -> Result<()> {
        self.call_with_input(
            Operation::SynchronizeInventory,
            self.symbols.synchronize_inventory,
            inventory_json,
        )
    }

    fn test_monitored_resource(&self, resource_json: &str) -> Result<String> {
        self.call_input_output(
            Operation::TestMonitoredResource,
            self.symbols.test_monitored_resource,
            resource_json,
        )
    }
}
