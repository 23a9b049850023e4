//! Two-stage clinical review: GENERATED → DOCTOR_REVIEWED → HOD_REVIEWED.
//!
//! Transitions are one-way; there is no un-reviewing. The stage itself is
//! derived from the sign-off timestamps on the report.

use jiff::Timestamp;
use thiserror::Error;

use nurtura_core::models::{FinalReport, ViewerCapability};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("report has already been reviewed by a doctor")]
    AlreadyDoctorReviewed,

    #[error("report must be reviewed by a doctor before department-head review")]
    NotDoctorReviewed,

    #[error("report has already been reviewed by the department head")]
    AlreadyHodReviewed,
}

/// Stamp the doctor sign-off. Fails if the report is already
/// doctor-reviewed.
pub fn mark_doctor_reviewed(
    report: &mut FinalReport,
    now: Timestamp,
    notes: Option<String>,
) -> Result<(), ReviewError> {
    if report.doctor_reviewed_at.is_some() {
        return Err(ReviewError::AlreadyDoctorReviewed);
    }
    report.doctor_reviewed_at = Some(now);
    report.doctor_notes = notes;
    Ok(())
}

/// Stamp the department-head sign-off — the final one. Fails if the
/// report has not been doctor-reviewed, or already carries the HOD stamp.
pub fn mark_hod_reviewed(
    report: &mut FinalReport,
    now: Timestamp,
    notes: Option<String>,
) -> Result<(), ReviewError> {
    if report.doctor_reviewed_at.is_none() {
        return Err(ReviewError::NotDoctorReviewed);
    }
    if report.hod_reviewed_at.is_some() {
        return Err(ReviewError::AlreadyHodReviewed);
    }
    report.hod_reviewed_at = Some(now);
    report.hod_notes = notes;
    Ok(())
}

/// Report visibility by capability: doctors read any generated report,
/// department heads only after doctor review, everyone else is denied.
pub fn visible_to(report: &FinalReport, capability: ViewerCapability) -> bool {
    match capability {
        ViewerCapability::Doctor => true,
        ViewerCapability::DepartmentHead => report.doctor_reviewed_at.is_some(),
        ViewerCapability::Other => false,
    }
}
