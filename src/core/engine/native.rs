//! Binding to the vendor delegate runtime shared library.
//!
//! The library is closed source and is discovered at runtime under the
//! delegate toolchain directory. All unsafety of the C boundary lives here;
//! the rest of the crate sees only [`InferenceEngine`].

use crate::core::config::{DelegateConfig, ToolchainEnv};
use crate::core::engine::{BenchmarkRecord, EngineMode, InferenceEngine};
use crate::core::errors::{OffloadError, OffloadResult};
use crate::core::Tensor4D;
use libloading::Library;
use std::ffi::{c_char, c_void, CString};
use std::path::Path;
use tracing::{debug, info};

/// Benchmark counters as laid out by the vendor library.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct RawBenchmark {
    total_time_us: u64,
    copy_in_us: u64,
    copy_out_us: u64,
    ddr_read_bytes: u64,
    ddr_write_bytes: u64,
    subgraphs: u32,
    _reserved: u32,
}

type CreateFn = unsafe extern "C" fn(u32, *const c_char) -> *mut c_void;
type InputShapeFn = unsafe extern "C" fn(*mut c_void, *mut i64, usize) -> i32;
type SetInputFn = unsafe extern "C" fn(*mut c_void, *const f32, usize) -> i32;
type InvokeFn = unsafe extern "C" fn(*mut c_void) -> i32;
type OutputLenFn = unsafe extern "C" fn(*mut c_void) -> usize;
type ReadOutputFn = unsafe extern "C" fn(*mut c_void, *mut f32, usize) -> i32;
type BenchmarkFn = unsafe extern "C" fn(*mut c_void, *mut RawBenchmark) -> i32;
type DestroyFn = unsafe extern "C" fn(*mut c_void);

/// Entry points resolved from the vendor library.
struct RawApi {
    create: CreateFn,
    input_shape: InputShapeFn,
    set_input: SetInputFn,
    invoke: InvokeFn,
    output_len: OutputLenFn,
    read_output: ReadOutputFn,
    benchmark: BenchmarkFn,
    destroy: DestroyFn,
}

impl RawApi {
    /// Resolves every entry point, failing on the first missing symbol.
    ///
    /// # Safety
    ///
    /// The symbols must have the C signatures declared above; the contract is
    /// fixed by the vendor ABI.
    unsafe fn resolve(lib: &Library) -> OffloadResult<Self> {
        unsafe fn sym<T: Copy>(lib: &Library, name: &[u8]) -> OffloadResult<T> {
            lib.get::<T>(name)
                .map(|s| *s)
                .map_err(|source| OffloadError::Library {
                    context: format!("missing symbol {}", String::from_utf8_lossy(name)),
                    source,
                })
        }

        Ok(Self {
            create: sym(lib, b"npu_delegate_create\0")?,
            input_shape: sym(lib, b"npu_delegate_input_shape\0")?,
            set_input: sym(lib, b"npu_delegate_set_input\0")?,
            invoke: sym(lib, b"npu_delegate_invoke\0")?,
            output_len: sym(lib, b"npu_delegate_output_len\0")?,
            read_output: sym(lib, b"npu_delegate_read_output\0")?,
            benchmark: sym(lib, b"npu_delegate_benchmark\0")?,
            destroy: sym(lib, b"npu_delegate_destroy\0")?,
        })
    }
}

/// An engine instance backed by the vendor delegate runtime.
///
/// The loaded [`Library`] must outlive the raw engine handle; the field order
/// here and the explicit [`Drop`] keep that invariant.
pub struct NativeDelegate {
    handle: *mut c_void,
    api: RawApi,
    _lib: Library,
    mode: EngineMode,
}

impl std::fmt::Debug for NativeDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeDelegate")
            .field("mode", &self.mode)
            .finish()
    }
}

impl NativeDelegate {
    /// Opens the delegate runtime at `library_path` and creates an engine
    /// instance configured from `config`.
    ///
    /// The option record crosses the boundary as a JSON object of string
    /// key/value pairs.
    pub fn open(
        library_path: &Path,
        mode: EngineMode,
        config: &DelegateConfig,
    ) -> OffloadResult<Self> {
        config.validate()?;
        let options_json = serde_json::to_string(&config.to_options())?;
        debug!(options = %options_json, %mode, "creating delegate engine");

        let lib = unsafe { Library::new(library_path) }.map_err(|source| OffloadError::Library {
            context: format!("failed to load {}", library_path.display()),
            source,
        })?;
        let api = unsafe { RawApi::resolve(&lib)? };

        let options_c = CString::new(options_json)
            .map_err(|_| OffloadError::invalid_input("option record contains a NUL byte"))?;
        let handle = unsafe { (api.create)(mode.as_raw(), options_c.as_ptr()) };
        if handle.is_null() {
            return Err(OffloadError::engine(format!(
                "create returned no engine in {mode} mode"
            )));
        }

        info!(library = %library_path.display(), %mode, "delegate engine ready");
        Ok(Self {
            handle,
            api,
            _lib: lib,
            mode,
        })
    }

    /// Opens the delegate runtime found under the delegate toolchain.
    pub fn open_with_env(
        env: &ToolchainEnv,
        mode: EngineMode,
        config: &DelegateConfig,
    ) -> OffloadResult<Self> {
        Self::open(&env.delegate_library(), mode, config)
    }

    /// The mode this engine instance was opened in.
    pub fn mode(&self) -> EngineMode {
        self.mode
    }
}

impl InferenceEngine for NativeDelegate {
    fn input_shape(&self) -> OffloadResult<Vec<i64>> {
        let mut dims = [0i64; 8];
        let rank = unsafe { (self.api.input_shape)(self.handle, dims.as_mut_ptr(), dims.len()) };
        if rank < 0 {
            return Err(OffloadError::engine_status("input_shape", rank));
        }
        Ok(dims[..rank as usize].to_vec())
    }

    fn set_input(&mut self, input: &Tensor4D) -> OffloadResult<()> {
        let contiguous = input.as_standard_layout();
        let slice = contiguous
            .as_slice()
            .ok_or_else(|| OffloadError::invalid_input("input tensor is not contiguous"))?;
        let status = unsafe { (self.api.set_input)(self.handle, slice.as_ptr(), slice.len()) };
        if status != 0 {
            return Err(OffloadError::engine_status("set_input", status));
        }
        Ok(())
    }

    fn invoke(&mut self) -> OffloadResult<()> {
        let status = unsafe { (self.api.invoke)(self.handle) };
        if status != 0 {
            return Err(OffloadError::engine_status("invoke", status));
        }
        Ok(())
    }

    fn output(&mut self) -> OffloadResult<Vec<f32>> {
        let len = unsafe { (self.api.output_len)(self.handle) };
        if len == 0 {
            return Err(OffloadError::engine("engine reports an empty output"));
        }
        let mut scores = vec![0f32; len];
        let status =
            unsafe { (self.api.read_output)(self.handle, scores.as_mut_ptr(), scores.len()) };
        if status != 0 {
            return Err(OffloadError::engine_status("read_output", status));
        }
        Ok(scores)
    }

    fn benchmark(&self) -> OffloadResult<BenchmarkRecord> {
        let mut raw = RawBenchmark::default();
        let status = unsafe { (self.api.benchmark)(self.handle, &mut raw) };
        if status != 0 {
            return Err(OffloadError::engine_status("benchmark", status));
        }
        Ok(BenchmarkRecord {
            total_time_us: raw.total_time_us,
            copy_in_us: raw.copy_in_us,
            copy_out_us: raw.copy_out_us,
            ddr_read_bytes: raw.ddr_read_bytes,
            ddr_write_bytes: raw.ddr_write_bytes,
            subgraphs: raw.subgraphs,
        })
    }
}

impl Drop for NativeDelegate {
    fn drop(&mut self) {
        // Handle first, library unload after.
        unsafe { (self.api.destroy)(self.handle) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_library_is_an_error() {
        let result = NativeDelegate::open(
            Path::new("/nonexistent/libnpu_delegate.so"),
            EngineMode::Compile,
            &DelegateConfig::default(),
        );
        assert!(matches!(result, Err(OffloadError::Library { .. })));
    }

    #[test]
    fn test_invalid_config_rejected_before_load() {
        let config = DelegateConfig::default().with_tensor_bits(12);
        let result = NativeDelegate::open(
            Path::new("/nonexistent/libnpu_delegate.so"),
            EngineMode::Compile,
            &config,
        );
        assert!(matches!(result, Err(OffloadError::Config { .. })));
    }
}
