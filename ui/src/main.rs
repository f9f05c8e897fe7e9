fn main() -> anyhow::Result<()> {
    ui::run()
}
