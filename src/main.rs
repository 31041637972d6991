fn main() -> anyhow::Result<()> {
    todo_report::cli::run()
}
