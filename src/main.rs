fn main() {
    topograph::cli::run();
}
