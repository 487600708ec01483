//! Output generation for the stf CLI application

use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::warn;

use stf::language::Engine;

static TEMPLATE: &str = r#"Name:        {name}
Description: {{ if description }}{description}{{ else }}(none){{ endif }}
"#;

#[derive(Serialize)]
struct Context<'a> {
    name: &'a str,
    description: &'a str,
}

/// Render the identifying details of an engine for the terminal.
pub fn engine_summary(engine: &Engine) -> String {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);

    let context = Context {
        name: &engine.name,
        description: &engine.description,
    };

    let rendered = tt
        .add_template("engine", TEMPLATE)
        .and_then(|_| tt.render("engine", &context));

    match rendered {
        Ok(text) => text,
        Err(error) => {
            warn!(?error, "template failed");
            format!("Name: {}\nDescription: {}\n", engine.name, engine.description)
        }
    }
}
