//! Built-in rename data: a representative slice of each supported CUDA API.
//!
//! Columns: CUDA name, HIP name, ROC name ("" = same as HIP), kind, API, support.

use super::{ApiFamily, ConvKind, RenameEntry, RenameTable, RenameTables, SupportTier};

use ApiFamily::*;
use ConvKind::*;
use SupportTier::*;

type Row = (&'static str, &'static str, &'static str, ConvKind, ApiFamily, SupportTier);

const IDENTIFIERS: &[Row] = &[
    // ── Runtime API ──
    ("cudaDriverGetVersion", "hipDriverGetVersion", "", Version, Runtime, Full),
    ("cudaRuntimeGetVersion", "hipRuntimeGetVersion", "", Version, Runtime, Full),
    ("cudaGetDeviceCount", "hipGetDeviceCount", "", Device, Runtime, Full),
    ("cudaSetDevice", "hipSetDevice", "", Device, Runtime, Full),
    ("cudaGetDevice", "hipGetDevice", "", Device, Runtime, Full),
    ("cudaGetDeviceProperties", "hipGetDeviceProperties", "", Device, Runtime, Full),
    ("cudaDeviceProp", "hipDeviceProp_t", "", Type, Runtime, Full),
    ("cudaDeviceSynchronize", "hipDeviceSynchronize", "", Device, Runtime, Full),
    ("cudaThreadSynchronize", "hipDeviceSynchronize", "", Device, Runtime, Full),
    ("cudaDeviceReset", "hipDeviceReset", "", Device, Runtime, Full),
    ("cudaThreadExit", "hipDeviceReset", "", Device, Runtime, Full),
    ("cudaSetValidDevices", "", "", Device, Runtime, Unsupported),
    ("cudaMalloc", "hipMalloc", "", Memory, Runtime, Full),
    ("cudaMallocHost", "hipHostMalloc", "", Memory, Runtime, Full),
    ("cudaMallocManaged", "hipMallocManaged", "", Memory, Runtime, Full),
    ("cudaMallocPitch", "hipMallocPitch", "", Memory, Runtime, Full),
    ("cudaFree", "hipFree", "", Memory, Runtime, Full),
    ("cudaFreeHost", "hipHostFree", "", Memory, Runtime, Full),
    ("cudaMemcpy", "hipMemcpy", "", Memory, Runtime, Full),
    ("cudaMemcpyAsync", "hipMemcpyAsync", "", Memory, Runtime, Full),
    ("cudaMemcpyToSymbol", "hipMemcpyToSymbol", "", Memory, Runtime, Full),
    ("cudaMemset", "hipMemset", "", Memory, Runtime, Full),
    ("cudaMemAdvise", "hipMemAdvise", "", Memory, Runtime, Partial),
    ("cudaMemcpyKind", "hipMemcpyKind", "", Type, Runtime, Full),
    ("cudaMemcpyHostToDevice", "hipMemcpyHostToDevice", "", Memory, Runtime, Full),
    ("cudaMemcpyDeviceToHost", "hipMemcpyDeviceToHost", "", Memory, Runtime, Full),
    ("cudaMemcpyDeviceToDevice", "hipMemcpyDeviceToDevice", "", Memory, Runtime, Full),
    ("cudaMemcpyDefault", "hipMemcpyDefault", "", Memory, Runtime, Full),
    ("cudaError_t", "hipError_t", "", Type, Runtime, Full),
    ("cudaSuccess", "hipSuccess", "", Error, Runtime, Full),
    ("cudaGetLastError", "hipGetLastError", "", Error, Runtime, Full),
    ("cudaPeekAtLastError", "hipPeekAtLastError", "", Error, Runtime, Full),
    ("cudaGetErrorString", "hipGetErrorString", "", Error, Runtime, Full),
    ("cudaGetErrorName", "hipGetErrorName", "", Error, Runtime, Full),
    ("cudaStream_t", "hipStream_t", "", Type, Runtime, Full),
    ("cudaStreamCreate", "hipStreamCreate", "", Stream, Runtime, Full),
    ("cudaStreamDestroy", "hipStreamDestroy", "", Stream, Runtime, Full),
    ("cudaStreamSynchronize", "hipStreamSynchronize", "", Stream, Runtime, Full),
    ("cudaEvent_t", "hipEvent_t", "", Type, Runtime, Full),
    ("cudaEventCreate", "hipEventCreate", "", Event, Runtime, Full),
    ("cudaEventRecord", "hipEventRecord", "", Event, Runtime, Full),
    ("cudaEventSynchronize", "hipEventSynchronize", "", Event, Runtime, Full),
    ("cudaEventElapsedTime", "hipEventElapsedTime", "", Event, Runtime, Full),
    ("cudaEventDestroy", "hipEventDestroy", "", Event, Runtime, Full),
    ("cudaLaunchKernel", "hipLaunchKernel", "", Execution, Runtime, Full),
    ("cudaFuncSetCacheConfig", "hipFuncSetCacheConfig", "", Execution, Runtime, Full),
    ("cudaGraphicsGLRegisterBuffer", "", "", Other, Runtime, Unsupported),
    ("cudaGLSetGLDevice", "", "", Other, Runtime, Unsupported),
    // ── Driver API ──
    ("cuInit", "hipInit", "", Init, Driver, Full),
    ("cuDriverGetVersion", "hipDriverGetVersion", "", Version, Driver, Full),
    ("cuDeviceGet", "hipDeviceGet", "", Device, Driver, Full),
    ("cuDeviceGetCount", "hipGetDeviceCount", "", Device, Driver, Full),
    ("cuCtxCreate", "hipCtxCreate", "", Context, Driver, Full),
    ("cuCtxDestroy", "hipCtxDestroy", "", Context, Driver, Full),
    ("cuMemAlloc", "hipMalloc", "", Memory, Driver, Full),
    ("cuMemFree", "hipFree", "", Memory, Driver, Full),
    ("cuModuleLoad", "hipModuleLoad", "", Module, Driver, Full),
    ("cuModuleGetFunction", "hipModuleGetFunction", "", Module, Driver, Full),
    ("cuLaunchKernel", "hipModuleLaunchKernel", "", Execution, Driver, Full),
    ("cuGLInit", "", "", Other, Driver, Unsupported),
    ("CUdevice", "hipDevice_t", "", Type, Driver, Full),
    ("CUcontext", "hipCtx_t", "", Type, Driver, Full),
    ("CUmodule", "hipModule_t", "", Type, Driver, Full),
    ("CUfunction", "hipFunction_t", "", Type, Driver, Full),
    ("CUresult", "hipError_t", "", Type, Driver, Full),
    ("CUDA_SUCCESS", "hipSuccess", "", Numeric, Driver, Full),
    // ── cuBLAS ──
    ("cublasHandle_t", "hipblasHandle_t", "rocblas_handle", Type, Blas, Full),
    ("cublasStatus_t", "hipblasStatus_t", "rocblas_status", Type, Blas, Full),
    ("cublasCreate", "hipblasCreate", "rocblas_create_handle", Other, Blas, Full),
    ("cublasCreate_v2", "hipblasCreate", "rocblas_create_handle", Other, Blas, Full),
    ("cublasDestroy", "hipblasDestroy", "rocblas_destroy_handle", Other, Blas, Full),
    ("cublasSetStream", "hipblasSetStream", "rocblas_set_stream", Stream, Blas, Full),
    ("cublasSgemm", "hipblasSgemm", "rocblas_sgemm", Math, Blas, Full),
    ("cublasDgemm", "hipblasDgemm", "rocblas_dgemm", Math, Blas, Full),
    ("cublasSaxpy", "hipblasSaxpy", "rocblas_saxpy", Math, Blas, Full),
    ("cublasGemmEx", "hipblasGemmEx", "rocblas_gemm_ex", Math, Blas, Partial),
    ("cublasSetMathMode", "", "", Other, Blas, Unsupported),
    ("cublasXtCreate", "", "", Other, Blas, Unsupported),
    ("cublasLtCreate", "hipblasLtCreate", "", Other, Blas, RocUnsupported),
    ("CUBLAS_STATUS_SUCCESS", "HIPBLAS_STATUS_SUCCESS", "rocblas_status_success", Numeric, Blas, Full),
    ("CUBLAS_OP_N", "HIPBLAS_OP_N", "rocblas_operation_none", Numeric, Blas, Full),
    ("CUBLAS_OP_T", "HIPBLAS_OP_T", "rocblas_operation_transpose", Numeric, Blas, Full),
    // ── cuRAND ──
    ("curandGenerator_t", "hiprandGenerator_t", "", Type, Rand, Full),
    ("curandCreateGenerator", "hiprandCreateGenerator", "", Other, Rand, Full),
    ("curandDestroyGenerator", "hiprandDestroyGenerator", "", Other, Rand, Full),
    ("curandSetPseudoRandomGeneratorSeed", "hiprandSetPseudoRandomGeneratorSeed", "", Other, Rand, Full),
    ("curandGenerateUniform", "hiprandGenerateUniform", "", Other, Rand, Full),
    ("curandState", "hiprandState", "", Type, Rand, Full),
    ("curand_init", "hiprand_init", "", DeviceFunc, Rand, Full),
    ("curand_uniform", "hiprand_uniform", "", DeviceFunc, Rand, Full),
    ("CURAND_RNG_PSEUDO_DEFAULT", "HIPRAND_RNG_PSEUDO_DEFAULT", "", Numeric, Rand, Full),
    // ── cuDNN ──
    ("cudnnHandle_t", "hipdnnHandle_t", "miopenHandle_t", Type, Dnn, Full),
    ("cudnnCreate", "hipdnnCreate", "miopenCreate", Other, Dnn, Full),
    ("cudnnDestroy", "hipdnnDestroy", "miopenDestroy", Other, Dnn, Full),
    ("cudnnSetStream", "hipdnnSetStream", "miopenSetStream", Stream, Dnn, Full),
    // ── cuFFT ──
    ("cufftHandle", "hipfftHandle", "", Type, Fft, Full),
    ("cufftComplex", "hipfftComplex", "", Type, Fft, Full),
    ("cufftPlan1d", "hipfftPlan1d", "", Other, Fft, Full),
    ("cufftExecC2C", "hipfftExecC2C", "", Other, Fft, Full),
    ("cufftDestroy", "hipfftDestroy", "", Other, Fft, Full),
    ("CUFFT_FORWARD", "HIPFFT_FORWARD", "", Numeric, Fft, Full),
    // ── cuComplex ──
    ("cuComplex", "hipComplex", "", Type, Complex, Full),
    ("cuFloatComplex", "hipFloatComplex", "", Type, Complex, Full),
    ("cuDoubleComplex", "hipDoubleComplex", "", Type, Complex, Full),
    ("make_cuComplex", "make_hipComplex", "", Math, Complex, Full),
    ("cuCaddf", "hipCaddf", "", Math, Complex, Full),
    ("cuCmulf", "hipCmulf", "", Math, Complex, Full),
    // ── cuSPARSE ──
    ("cusparseHandle_t", "hipsparseHandle_t", "rocsparse_handle", Type, Sparse, Full),
    ("cusparseCreate", "hipsparseCreate", "rocsparse_create_handle", Other, Sparse, Full),
    ("cusparseDestroy", "hipsparseDestroy", "rocsparse_destroy_handle", Other, Sparse, Full),
    ("cusparseSetStream", "hipsparseSetStream", "rocsparse_set_stream", Stream, Sparse, Full),
];

const HEADERS: &[Row] = &[
    ("cuda.h", "hip/hip_runtime.h", "", IncludeMain, Driver, Full),
    ("cuda_runtime.h", "hip/hip_runtime.h", "", IncludeMain, Runtime, Full),
    ("cuda_runtime_api.h", "hip/hip_runtime_api.h", "", Include, Runtime, Full),
    ("device_functions.h", "", "", Include, Runtime, Full),
    ("device_launch_parameters.h", "", "", Include, Runtime, Full),
    ("cuda_profiler_api.h", "hip/hip_profile.h", "", Include, Runtime, Full),
    ("cuda_gl_interop.h", "", "", Include, Runtime, Unsupported),
    ("cudaGL.h", "", "", Include, Driver, Unsupported),
    ("cublas.h", "hipblas.h", "rocblas.h", IncludeMain, Blas, Full),
    ("cublas_v2.h", "hipblas.h", "rocblas.h", IncludeMain, Blas, Full),
    ("curand.h", "hiprand.h", "", IncludeMain, Rand, Full),
    ("curand_kernel.h", "hiprand_kernel.h", "", IncludeMain, Rand, Full),
    ("curand_discrete.h", "hiprand_kernel.h", "", Include, Rand, Full),
    ("curand_mtgp32_host.h", "hiprand_mtgp32_host.h", "", Include, Rand, Full),
    ("cudnn.h", "hipDNN.h", "miopen/miopen.h", IncludeMain, Dnn, Full),
    ("cufft.h", "hipfft.h", "", IncludeMain, Fft, Full),
    ("cuComplex.h", "hip/hip_complex.h", "", IncludeMain, Complex, Full),
    ("cusparse.h", "hipsparse.h", "rocsparse.h", IncludeMain, Sparse, Full),
    ("cusparse_v2.h", "hipsparse.h", "rocsparse.h", IncludeMain, Sparse, Full),
];

const DEVICE_FUNCTIONS: &[Row] = &[
    ("__ldg", "__ldg", "", DeviceFunc, Runtime, Full),
    ("__fdividef", "__fdividef", "", DeviceFunc, Runtime, Full),
    ("__saturatef", "__saturatef", "", DeviceFunc, Runtime, Full),
    ("__umulhi", "__umulhi", "", DeviceFunc, Runtime, Full),
    ("__brev", "__brev", "", DeviceFunc, Runtime, Full),
    ("__ffs", "__ffs", "", DeviceFunc, Runtime, Full),
    ("__popc", "__popc", "", DeviceFunc, Runtime, Full),
    ("__threadfence_system", "__threadfence_system", "", DeviceFunc, Runtime, Full),
    ("__prof_trigger", "", "", DeviceFunc, Runtime, Unsupported),
    ("__nanosleep", "", "", DeviceFunc, Runtime, Unsupported),
];

fn table(rows: &[Row]) -> RenameTable {
    rows.iter()
        .map(|&(cuda, hip, roc, kind, api, support)| {
            let entry = RenameEntry::new(hip, kind, api)
                .with_roc(roc)
                .with_support(support);
            (cuda.to_string(), entry)
        })
        .collect()
}

pub(super) fn tables() -> RenameTables {
    RenameTables {
        identifiers: table(IDENTIFIERS),
        headers: table(HEADERS),
        device_functions: table(DEVICE_FUNCTIONS),
    }
}
