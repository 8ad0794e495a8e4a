// Models module - Database entity representations

pub mod assessment_result;
pub mod assignment;
pub mod email_verification;
pub mod expert;
pub mod feedback;
pub mod question;
pub mod response;
pub mod self_assessment;
pub mod superuser;
pub mod system;
pub mod user;

pub use assessment_result::AssessmentResult;
pub use assignment::Assignment;
pub use email_verification::EmailVerification;
pub use expert::Expert;
pub use feedback::Feedback;
pub use question::{QualitativeQuestion, QuantitativeQuestion};
pub use response::{Answer, QualitativeResponse, QuantitativeResponse};
pub use self_assessment::SelfAssessment;
pub use superuser::SuperUser;
pub use system::System;
pub use user::User;
