fn main() -> anyhow::Result<()> {
    kvbench::run()
}
