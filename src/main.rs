fn main() {
    custom_codable::cli::run();
}
