use vbm::cli::{self, ConfigFile};
use vbm::config::{self, Config};
use vbm::lessons::{self, Lesson};
use vbm::model::Model;

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("vbm: {e}");
            eprintln!("{}", cli::USAGE);
            std::process::exit(1);
        }
    };

    // ── Load rc files ─────────────────────────────────────────────────────────
    // Logging is not up yet; problems are reported once it is.
    let mut config = Config::new();
    let mut problems: Vec<String> = Vec::new();
    let paths = match &args.config {
        ConfigFile::Skip => Vec::new(),
        ConfigFile::Explicit(path) => vec![path.clone()],
        ConfigFile::Search => config::find_user_configs(),
    };
    for path in &paths {
        match config.apply_file(path) {
            Ok(errors) => {
                problems.extend(errors.iter().map(|e| format!("{}: {e}", path.display())));
            }
            Err(e) => problems.push(format!("{}: {e}", path.display())),
        }
    }

    // ── Logging ───────────────────────────────────────────────────────────────
    let default_filter = if args.debug { "debug" } else { config.log.as_deref().unwrap_or("warn") };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::new().filter_or("VBM_LOG", default_filter));
    if args.debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    for problem in &problems {
        log::warn!("config {problem}");
    }

    // ── List ──────────────────────────────────────────────────────────────────
    if args.list {
        for lesson in lessons::LESSONS {
            println!("{:<12} {}", lesson.name, lesson.title);
        }
        return;
    }

    // ── Select lessons ────────────────────────────────────────────────────────
    let selected: Vec<&Lesson> = if args.lessons.is_empty() {
        lessons::LESSONS.iter().collect()
    } else {
        let mut selected = Vec::with_capacity(args.lessons.len());
        for name in &args.lessons {
            match lessons::find(name) {
                Some(lesson) => selected.push(lesson),
                None => {
                    eprintln!("vbm: unknown lesson '{name}' (try -l)");
                    std::process::exit(1);
                }
            }
        }
        selected
    };

    // ── Run ───────────────────────────────────────────────────────────────────
    let headers = config.headers && !args.quiet;
    for (i, lesson) in selected.iter().enumerate() {
        if headers {
            if i > 0 {
                println!();
            }
            println!("── {} ──", lesson.title);
        }
        log::info!("running lesson {}", lesson.name);
        let mut model = Model::with_options(config.render_options());
        let result = (lesson.run)(&mut model);
        for line in model.take_output() {
            println!("{line}");
        }
        if let Err(e) = result {
            eprintln!("vbm: {}: {e}", lesson.name);
            std::process::exit(1);
        }
    }
}
