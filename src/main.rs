fn main() {
    artifact_graph::cli::run();
}
