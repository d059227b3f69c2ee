use kalman_ffi::ffi::{
    clear_last_error, eigen_hits_to_nalgebra_hits, eigen_to_nalgebra, kf_clear_last_error,
    kf_filter_installed, kf_last_error, kf_last_error_message, kf_result_bundle,
    kf_result_release, last_error, live_results, make_array, run_const_b_kf, run_linear_kf,
    with_result, KfResultHandle, ResultBundle,
};
use kalman_ffi::filter::{install_filter, install_shared_filter, uninstall_filter};
use kalman_ffi::types::{Mat2, Mat5, Vec2, Vec3, Vec5};
use kalman_ffi::{BoundaryError, BoundaryStatus, FilterError, FilterOutput, TrackFilter};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// The installed filter is process-wide, so tests touching it run one at a time.
static SERIAL: Mutex<()> = parking_lot::const_mutex(());

fn serial() -> MutexGuard<'static, ()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    clear_last_error();
    SERIAL.lock()
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    hits: Vec<Vec2>,
    covariances: Vec<Mat2>,
    b_field: Option<Vec3>,
}

/// Echoes each hit back as a residual and records what it was given.
#[derive(Default)]
struct RecordingFilter {
    calls: Mutex<Vec<Call>>,
}

impl RecordingFilter {
    fn echo(&self, call: Call) -> FilterOutput {
        let mut output = FilterOutput::with_capacity(call.hits.len());
        for (hit, cov) in call.hits.iter().zip(&call.covariances) {
            output.push(
                Vec5::new(hit.x, hit.y, 0.0, 0.0, 0.0),
                Mat5::identity(),
                *cov,
                *hit,
            );
        }
        self.calls.lock().push(call);
        output
    }
}

impl TrackFilter for RecordingFilter {
    fn run_linear(&self, hits: &[Vec2], covariances: &[Mat2]) -> Result<FilterOutput, FilterError> {
        Ok(self.echo(Call {
            hits: hits.to_vec(),
            covariances: covariances.to_vec(),
            b_field: None,
        }))
    }

    fn run_const_b(
        &self,
        hits: &[Vec2],
        covariances: &[Mat2],
        b_field: &Vec3,
    ) -> Result<FilterOutput, FilterError> {
        Ok(self.echo(Call {
            hits: hits.to_vec(),
            covariances: covariances.to_vec(),
            b_field: Some(*b_field),
        }))
    }
}

struct FailingFilter;

impl TrackFilter for FailingFilter {
    fn run_linear(&self, _: &[Vec2], _: &[Mat2]) -> Result<FilterOutput, FilterError> {
        Err(FilterError::NonInvertible)
    }

    fn run_const_b(&self, _: &[Vec2], _: &[Mat2], _: &Vec3) -> Result<FilterOutput, FilterError> {
        panic!("constant field filter exploded")
    }
}

/// Drops the last residual so the result sequences disagree in length.
struct TruncatingFilter;

impl TrackFilter for TruncatingFilter {
    fn run_linear(&self, hits: &[Vec2], covariances: &[Mat2]) -> Result<FilterOutput, FilterError> {
        let mut output = RecordingFilter::default().echo(Call {
            hits: hits.to_vec(),
            covariances: covariances.to_vec(),
            b_field: None,
        });
        output.residual_vectors.pop();
        Ok(output)
    }

    fn run_const_b(
        &self,
        hits: &[Vec2],
        covariances: &[Mat2],
        _: &Vec3,
    ) -> Result<FilterOutput, FilterError> {
        self.run_linear(hits, covariances)
    }
}

fn install_recording() -> Arc<RecordingFilter> {
    let filter = Arc::new(RecordingFilter::default());
    install_shared_filter(filter.clone());
    filter
}

fn message() -> String {
    let mut buf = [0 as core::ffi::c_char; 256];
    let written = unsafe { kf_last_error_message(buf.as_mut_ptr(), buf.len()) };
    assert!(written >= 0);
    let bytes: Vec<u8> = buf[..written as usize].iter().map(|&c| c as u8).collect();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn make_array_sums_exactly_length_values() {
    let _guard = serial();
    let data = [1.0, 2.0, 3.0, 4.0, f64::NAN, f64::NAN];
    let sum = unsafe { make_array(data.as_ptr(), 4) };
    assert_eq!(sum, 16.0);
}

#[test]
fn make_array_zero_length_ignores_null() {
    let _guard = serial();
    let sum = unsafe { make_array(core::ptr::null(), 0) };
    assert_eq!(sum, 6.0);
    assert_eq!(kf_last_error(), BoundaryStatus::Ok);
}

#[test]
fn make_array_negative_length_fails() {
    let _guard = serial();
    let data = [1.0];
    let sum = unsafe { make_array(data.as_ptr(), -1) };
    assert!(sum.is_nan());
    assert_eq!(kf_last_error(), BoundaryStatus::InvalidLength);
    assert_eq!(message(), "invalid length -1 for `length`");
}

#[test]
fn make_array_null_pointer_fails() {
    let _guard = serial();
    let sum = unsafe { make_array(core::ptr::null(), 3) };
    assert!(sum.is_nan());
    assert_eq!(
        last_error(),
        Some(BoundaryError::NullPointer {
            argument: "arr_start"
        })
    );
}

#[test]
fn eigen_to_nalgebra_accepts_aligned_interior_pointer() {
    let _guard = serial();
    let mut data = [f64::NAN; 11];
    for i in 0..9 {
        data[i + 1] = (i + 1) as f64;
    }
    let status = unsafe { eigen_to_nalgebra(data[1..].as_ptr()) };
    assert_eq!(status, BoundaryStatus::Ok);
}

#[test]
fn successful_call_clears_previous_failure() {
    let _guard = serial();
    let sum = unsafe { make_array(core::ptr::null(), 1) };
    assert!(sum.is_nan());
    assert_eq!(kf_last_error(), BoundaryStatus::NullPointer);

    // A NaN in valid data is told apart from a failure by the slot.
    let data = [f64::NAN];
    let sum = unsafe { make_array(data.as_ptr(), 1) };
    assert!(sum.is_nan());
    assert_eq!(kf_last_error(), BoundaryStatus::Ok);
    assert_eq!(last_error(), None);

    unsafe { make_array(core::ptr::null(), 1) };
    let matrix = [0.0_f64; 9];
    let status = unsafe { eigen_to_nalgebra(matrix.as_ptr()) };
    assert_eq!(status, BoundaryStatus::Ok);
    assert_eq!(kf_last_error(), BoundaryStatus::Ok);

    unsafe { make_array(core::ptr::null(), 1) };
    assert_eq!(kf_result_release(KfResultHandle(u64::MAX)), BoundaryStatus::StaleHandle);
    assert_eq!(kf_last_error(), BoundaryStatus::StaleHandle);
}

#[test]
fn last_error_can_be_cleared_from_c() {
    let _guard = serial();
    unsafe { make_array(core::ptr::null(), 1) };
    assert_eq!(kf_last_error(), BoundaryStatus::NullPointer);

    kf_clear_last_error();
    assert_eq!(kf_last_error(), BoundaryStatus::Ok);
    let mut buf = [0 as core::ffi::c_char; 16];
    assert_eq!(
        unsafe { kf_last_error_message(buf.as_mut_ptr(), buf.len()) },
        0
    );
}

#[test]
fn eigen_to_nalgebra_rejects_misaligned_pointer() {
    let _guard = serial();
    let data = [0.0_f64; 10];
    let ptr = (data.as_ptr() as *const u8).wrapping_add(4) as *const f64;
    let status = unsafe { eigen_to_nalgebra(ptr) };
    assert_eq!(status, BoundaryStatus::Misaligned);
    assert!(message().contains("`matrix_ptr`"));
}

#[test]
fn eigen_hits_to_nalgebra_hits_status_codes() {
    let _guard = serial();
    let data = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(
        unsafe { eigen_hits_to_nalgebra_hits(data.as_ptr(), 2) },
        BoundaryStatus::Ok
    );
    assert_eq!(
        unsafe { eigen_hits_to_nalgebra_hits(core::ptr::null(), 0) },
        BoundaryStatus::Ok
    );
    assert_eq!(
        unsafe { eigen_hits_to_nalgebra_hits(core::ptr::null(), 2) },
        BoundaryStatus::NullPointer
    );
}

#[test]
fn run_linear_kf_without_filter_fails() {
    let _guard = serial();
    uninstall_filter();
    assert_eq!(kf_filter_installed(), 0);

    let handle = unsafe { run_linear_kf(core::ptr::null(), core::ptr::null(), 0) };
    assert!(handle.is_invalid());
    assert_eq!(kf_last_error(), BoundaryStatus::NoFilterInstalled);
}

#[test]
fn run_linear_kf_reads_paired_blocks_only() {
    let _guard = serial();
    let filter = install_recording();
    assert_eq!(kf_filter_installed(), 1);

    let hits = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, f64::NAN, f64::NAN];
    let covariances = [
        0.1, 0.0, 0.0, 0.2, //
        0.3, 0.0, 0.0, 0.4, //
        0.5, 0.0, 0.0, 0.6, //
        f64::NAN, f64::NAN, f64::NAN, f64::NAN,
    ];

    let handle = unsafe { run_linear_kf(hits.as_ptr(), covariances.as_ptr(), 3) };
    assert!(!handle.is_invalid());

    let calls = filter.calls.lock().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].hits,
        vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)]
    );
    assert_eq!(calls[0].covariances[2], Mat2::new(0.5, 0.0, 0.0, 0.6));
    assert_eq!(calls[0].b_field, None);

    assert_eq!(kf_result_release(handle), BoundaryStatus::Ok);
    uninstall_filter();
}

#[test]
fn run_const_b_kf_passes_field() {
    let _guard = serial();
    let filter = install_recording();

    let hits = [1.0, 2.0];
    let covariances = [1.0, 0.0, 0.0, 1.0];
    let field = [0.0, 0.0, 2.0, f64::NAN];

    let handle =
        unsafe { run_const_b_kf(hits.as_ptr(), covariances.as_ptr(), field.as_ptr(), 1) };
    assert!(!handle.is_invalid());
    assert_eq!(
        filter.calls.lock()[0].b_field,
        Some(Vec3::new(0.0, 0.0, 2.0))
    );

    assert_eq!(kf_result_release(handle), BoundaryStatus::Ok);
    uninstall_filter();
}

#[test]
fn run_const_b_kf_rejects_null_field() {
    let _guard = serial();
    let filter = install_recording();

    let handle = unsafe {
        run_const_b_kf(
            [1.0, 2.0].as_ptr(),
            [1.0, 0.0, 0.0, 1.0].as_ptr(),
            core::ptr::null(),
            1,
        )
    };
    assert!(handle.is_invalid());
    assert_eq!(
        last_error(),
        Some(BoundaryError::NullPointer { argument: "b_field" })
    );
    assert!(filter.calls.lock().is_empty());
    uninstall_filter();
}

#[test]
fn result_bundle_stays_valid_until_release() {
    let _guard = serial();
    install_recording();

    let hits = [1.0, 2.0, 3.0, 4.0];
    let covariances = [0.1, 0.0, 0.0, 0.2, 0.3, 0.0, 0.0, 0.4];
    let baseline = live_results();
    let handle = unsafe { run_linear_kf(hits.as_ptr(), covariances.as_ptr(), 2) };
    assert_eq!(live_results(), baseline + 1);

    let mut bundle = ResultBundle::EMPTY;
    assert_eq!(
        unsafe { kf_result_bundle(handle, &mut bundle) },
        BoundaryStatus::Ok
    );
    assert_eq!(bundle.len, 2);

    // Run more calls in between; the first result must not move or change.
    let other = unsafe { run_linear_kf(hits.as_ptr(), covariances.as_ptr(), 2) };
    assert_eq!(live_results(), baseline + 2);
    assert_eq!(kf_result_release(other), BoundaryStatus::Ok);
    assert_eq!(live_results(), baseline + 1);

    let residuals = unsafe { core::slice::from_raw_parts(bundle.residual_vectors, 4) };
    assert_eq!(residuals, &hits);
    let residual_covariances =
        unsafe { core::slice::from_raw_parts(bundle.residual_covariances, 8) };
    assert_eq!(residual_covariances, &covariances);
    let states = unsafe { core::slice::from_raw_parts(bundle.state_vectors, 10) };
    assert_eq!(&states[5..7], &[3.0, 4.0]);

    let entries = with_result(handle, |output| output.covariances.len()).unwrap();
    assert_eq!(entries, 2);

    assert_eq!(kf_result_release(handle), BoundaryStatus::Ok);
    assert_eq!(live_results(), baseline);
    assert_eq!(kf_result_release(handle), BoundaryStatus::StaleHandle);
    assert_eq!(live_results(), baseline);
    assert_eq!(
        unsafe { kf_result_bundle(handle, &mut bundle) },
        BoundaryStatus::StaleHandle
    );
    uninstall_filter();
}

#[test]
fn result_bundle_rejects_null_out() {
    let _guard = serial();
    let status = unsafe { kf_result_bundle(KfResultHandle(1), core::ptr::null_mut()) };
    assert_eq!(status, BoundaryStatus::NullPointer);
}

#[test]
fn filter_failures_are_reported() {
    let _guard = serial();
    install_filter(FailingFilter);

    let hits = [1.0, 2.0];
    let covariances = [1.0, 0.0, 0.0, 1.0];
    let field = [0.0, 0.0, 1.0];

    let handle = unsafe { run_linear_kf(hits.as_ptr(), covariances.as_ptr(), 1) };
    assert!(handle.is_invalid());
    assert_eq!(kf_last_error(), BoundaryStatus::FilterFailed);
    assert_eq!(message(), "track filter failed: matrix is not invertible");

    let handle =
        unsafe { run_const_b_kf(hits.as_ptr(), covariances.as_ptr(), field.as_ptr(), 1) };
    assert!(handle.is_invalid());
    assert_eq!(kf_last_error(), BoundaryStatus::Panicked);

    uninstall_filter();
}

#[test]
fn last_error_message_needs_room() {
    let _guard = serial();
    unsafe { make_array(core::ptr::null(), 1) };

    let mut tiny = [0 as core::ffi::c_char; 4];
    assert_eq!(
        unsafe { kf_last_error_message(tiny.as_mut_ptr(), tiny.len()) },
        -1
    );
    assert_eq!(
        unsafe { kf_last_error_message(core::ptr::null_mut(), 64) },
        -1
    );

    clear_last_error();
    assert_eq!(
        unsafe { kf_last_error_message(tiny.as_mut_ptr(), tiny.len()) },
        0
    );
}

#[test]
fn failed_filter_calls_store_nothing() {
    let _guard = serial();
    let hits = [1.0, 2.0];
    let covariances = [1.0, 0.0, 0.0, 1.0];
    let field = [0.0, 0.0, 1.0];
    let baseline = live_results();

    uninstall_filter();
    let handle = unsafe { run_linear_kf(hits.as_ptr(), covariances.as_ptr(), 1) };
    assert!(handle.is_invalid());
    assert_eq!(kf_last_error(), BoundaryStatus::NoFilterInstalled);
    assert_eq!(live_results(), baseline);

    install_filter(TruncatingFilter);
    let handle = unsafe { run_linear_kf(hits.as_ptr(), covariances.as_ptr(), 1) };
    assert!(handle.is_invalid());
    assert_eq!(kf_last_error(), BoundaryStatus::InconsistentOutput);
    assert_eq!(live_results(), baseline);

    install_filter(FailingFilter);
    let handle = unsafe { run_linear_kf(hits.as_ptr(), covariances.as_ptr(), 1) };
    assert!(handle.is_invalid());
    assert_eq!(kf_last_error(), BoundaryStatus::FilterFailed);
    assert_eq!(live_results(), baseline);

    let handle =
        unsafe { run_const_b_kf(hits.as_ptr(), covariances.as_ptr(), field.as_ptr(), 1) };
    assert!(handle.is_invalid());
    assert_eq!(kf_last_error(), BoundaryStatus::Panicked);
    assert_eq!(live_results(), baseline);

    uninstall_filter();
}
