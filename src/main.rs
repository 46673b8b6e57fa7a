use quizdeck_client::app_state::AppState;
use quizdeck_client::cli;
use quizdeck_client::config::Config;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("Failed to initialize: {}", err);
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("login") => cli::login(&state, &args[1..]).await,
        Some("register") => cli::register(&state, &args[1..]).await,
        Some("logout") => {
            state.auth.logout();
            Ok(())
        }
        Some("whoami") => {
            cli::whoami(&state);
            Ok(())
        }
        Some("dashboard") => cli::dashboard(&state).await,
        Some("take") => cli::take_quiz(&state, &args[1..]).await,
        Some("attempts") => cli::list_attempts(&state, &args[1..]).await,
        Some("create-quiz") => cli::create_quiz(&state, &args[1..]).await,
        Some("delete-quiz") => cli::delete_quiz(&state, &args[1..]).await,
        Some("author") => cli::author_questions(&state, &args[1..]).await,
        _ => {
            cli::usage();
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
