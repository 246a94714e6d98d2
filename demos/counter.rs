//! Counter Example - the counter widget in a full-screen terminal
//!
//! Keys:
//! - `+` / `-` (or arrows) change the count
//! - Tab / Shift+Tab move focus, Enter or Space press the focused button
//! - `q`, Escape or Ctrl+C quit
//!
//! Environment:
//! - `COUNTER_APP_THEME` - preset name (`ddd`, `terminal`)
//! - `COUNTER_APP_LOCALE` - locale code; `es` and `fr` have a title
//! - `COUNTER_APP_LOG` - file to write logs to (`RUST_LOG` filters)
//!
//! Run with: cargo run --example counter

use std::fs::File;
use std::rc::Rc;
use std::sync::Mutex;

use counter_app::{mount, register, run, CounterApp, CounterProps, Localized, StaticLocales, TAG};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // The screen belongs to the widget, so logs only go to a file
    let Ok(path) = std::env::var("COUNTER_APP_LOG") else {
        return;
    };
    let Ok(file) = File::create(&path) else {
        eprintln!("cannot open log file {path}");
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn locales() -> Rc<StaticLocales> {
    let locales = Rc::new(StaticLocales::new());
    locales.insert(TAG, "es", "title", "Contador");
    locales.insert(TAG, "fr", "title", "Compteur");
    locales
}

fn main() -> counter_app::Result<()> {
    init_logging();
    register()?;

    let app = CounterApp::from_props(CounterProps {
        count: 17,
        theme: std::env::var("COUNTER_APP_THEME").ok(),
        locale: std::env::var("COUNTER_APP_LOCALE").ok(),
        ..Default::default()
    })?;
    app.localization().register_with(locales());
    app.set_slot(Some("18 and 21 are special. Try them.".to_string()));

    let handle = mount(Rc::new(app))?;
    run(&handle)?;
    handle.unmount();
    Ok(())
}
