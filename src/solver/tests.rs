mod utils;

mod certifications;
