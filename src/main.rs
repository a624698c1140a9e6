use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    schoolbot::cli::main()
}
