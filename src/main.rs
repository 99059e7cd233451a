#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = scan_glass_lib::run(args).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
