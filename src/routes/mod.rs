pub mod auth;

pub mod principals;

pub mod exams;

pub mod exam_requests;

pub use auth::configure_auth_routes;
pub use exam_requests::configure_exam_requests_routes;
pub use exams::configure_exams_routes;
pub use principals::configure_principals_routes;
