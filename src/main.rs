use std::io::BufRead;
use std::sync::Arc;

use names::{prettify_function, prettify_type, scopes};

fn prettify(name: &str) -> Arc<str> {
    if args::ARGS.function {
        prettify_function(name)
    } else {
        prettify_type(name)
    }
}

fn print_scopes(name: &str) {
    for scope in scopes(name) {
        print!("{}", scope.identifier);
        if let Some(template) = scope.template {
            print!(" <{}>", template.args);
        }
        if let Some(func) = scope.function {
            print!(" ({})", func.args);
            if !func.specs.is_empty() {
                print!(" [{}]", func.specs);
            }
            if !func.return_type.is_empty() {
                print!(" -> {}", func.return_type);
            }
        }
        println!();
    }
}

fn handle(name: &str) {
    if args::ARGS.scopes {
        print_scopes(name);
    } else {
        println!("{}", prettify(name));
    }
}

fn main() {
    env_logger::init();

    if !args::ARGS.names.is_empty() {
        for name in &args::ARGS.names {
            handle(name);
        }
        return;
    }

    // no names given, act as a line filter
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };

        let name = line.trim();
        if name.is_empty() {
            println!();
            continue;
        }
        handle(name);
    }
}
