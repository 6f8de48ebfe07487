use freeform::{parse_with_config, ParserConfig};
use tracing_subscriber::EnvFilter;

const PASTED: &str = "\
Weeknight Shakshuka

A quick one-pan dinner.

Ingredients
- 2 tbsp olive oil
- 1 onion, diced
- 400g tinned tomatoes
- 4 eggs
- Salt and pepper

Method
1. Heat the oil and soften the onion.
2. Add tomatoes and simmer for 10 minutes.
3. Make wells, crack in the eggs and cover until set.

Notes
Serve with crusty bread.
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("freeform=debug")),
        )
        .init();

    let config = ParserConfig::default();
    if let Err(err) = config.validate() {
        eprintln!("invalid parser config: {err}");
        return;
    }

    let result = parse_with_config(PASTED, &config);
    println!("mode: {} (confidence {:.2})", result.mode, result.confidence);
    if let Some(title) = &result.title {
        println!("title: {title}");
    }
    for (label, lines) in [
        ("ingredients", &result.ingredients),
        ("instructions", &result.instructions),
        ("prose", &result.prose),
    ] {
        println!("{label}:");
        for line in lines {
            println!("  {line}");
        }
    }

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize parse result: {err}"),
    }
}
