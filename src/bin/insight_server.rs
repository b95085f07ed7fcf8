use ocean_tasks::insight::server;

fn main() -> anyhow::Result<()> {
    // Protocol messages own stdout; diagnostics go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    server::run()
}
