fn main() {
    if let Err(e) = particle_screensaver::core::Engine::run() {
        tracing::error!(target: "engine", "{}", e);
        eprintln!("Particle screensaver failed to start: {}", e);
        std::process::exit(1);
    }
}
