use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    match loxi_drv::run_cli(&args) {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {error:#}");
            process::exit(1);
        }
    }
}
