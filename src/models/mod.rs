pub mod enrollment;
pub mod grades;
pub mod identity;
pub mod section;
