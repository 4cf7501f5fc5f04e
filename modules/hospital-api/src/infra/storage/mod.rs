pub mod appointments;
pub mod doctors;
pub mod mapper;
pub mod migrations;
pub mod patients;
pub mod users;
