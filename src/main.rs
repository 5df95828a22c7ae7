fn main() -> anyhow::Result<()> {
    floating_bubble::run()
}
