fn main() -> anyhow::Result<()> {
    fmu_launch::entrypoint()
}
