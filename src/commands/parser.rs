// Command enum to represent storage commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Root,
    Summary(Option<String>),
    Size(String),
    Zip {
        source: String,
        destination: String,
        include_folder: bool,
    },
    Delete(String),
    Check(String),
    Unknown(String),
}

// Parse command-line arguments into Command enum
pub fn parse_command(args: &[String]) -> Command {
    let mut parts = args.iter().map(|arg| arg.trim());
    let cmd = parts.next().unwrap_or("").to_ascii_lowercase();
    let rest: Vec<&str> = parts.collect();

    match (cmd.as_str(), rest.as_slice()) {
        ("root", []) => Command::Root,
        ("summary", []) => Command::Summary(None),
        ("summary", [path]) => Command::Summary(Some(path.to_string())),
        ("size", [path]) => Command::Size(path.to_string()),
        ("delete" | "rm", [path]) => Command::Delete(path.to_string()),
        ("check", [path]) => Command::Check(path.to_string()),
        ("zip", [source, destination]) => Command::Zip {
            source: source.to_string(),
            destination: destination.to_string(),
            include_folder: false,
        },
        ("zip", [source, destination, "--with-folder"]) => Command::Zip {
            source: source.to_string(),
            destination: destination.to_string(),
            include_folder: true,
        },
        _ => Command::Unknown(args.join(" ")),
    }
}
