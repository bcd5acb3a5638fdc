//! Gozer Dashboard - Entry Point
//!
//! Command line access to the dashboard services: list deployments, inspect
//! one with its image history, show an application, or roll out an image.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use colored::Colorize;
use serde::Serialize;

use gozer_dashboard::logs::{init_logging, LogLevel};
use gozer_dashboard::models::{ApplicationDetails, DeploymentView, DeploymentWithImageData, EnhancedImage};
use gozer_dashboard::settings::Settings;
use gozer_dashboard::utils::version_info;
use gozer_dashboard::{DeploymentService, ImagesService};

use tracing::{error, info};

const USAGE: &str = "\
Usage: gozer-dash [--config=PATH] [--base-url=URL] [--json] [log options] <command>

Log options:
  --log-level=LEVEL                        trace, debug, info, warn or error
  --log-json                               JSON lines on stderr
  --log-dir=DIR                            Also write daily rolling files to DIR
  --quiet                                  No log output on stderr

Commands:
  --list                                   List deployments
  --deployment=NAME [--with-images]        Show one deployment
  --app=NAME                               Show an application and its image history
  --images=NAME [--image-version=V]        Show image builds
  --set=DEPLOYMENT --container=C --image=I Point a container at a new image
  --version                                Print version information";

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{version}"),
            Err(e) => eprintln!("Failed to render version: {e}"),
        }
        return;
    }

    if cli_args.contains_key("help") || cli_args.is_empty() {
        println!("{USAGE}");
        return;
    }

    if let Err(e) = run(&cli_args).await {
        error!("{:#}", e);
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli_args: &HashMap<String, String>) -> anyhow::Result<()> {
    let mut settings = match cli_args.get("config") {
        Some(path) => Settings::load(&PathBuf::from(path))
            .await
            .with_context(|| format!("unable to read settings file {path}"))?,
        None => Settings::default(),
    };
    if let Some(base_url) = cli_args.get("base-url") {
        settings.backend.base_url = base_url.clone();
    }
    if let Some(level) = cli_args.get("log-level") {
        settings.log_level = level.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(dir) = cli_args.get("log-dir") {
        settings.log.dir = Some(PathBuf::from(dir));
    }
    if cli_args.contains_key("log-json") {
        settings.log.json = true;
    }
    if cli_args.contains_key("quiet") {
        settings.log.console = false;
    }

    // Initialize logging
    let _log_guard = init_logging(settings.log_options()).context("failed to initialize logging")?;

    let transport = settings.backend.transport().context("failed to build HTTP client")?;
    let images = ImagesService::with_source(transport.clone(), settings.images_source.clone());
    let deployments = DeploymentService::new(transport, images.clone());
    info!("Using Gozer API at {}", settings.backend.base_url);

    let json = cli_args.contains_key("json");

    if cli_args.contains_key("list") {
        let views = deployments.list().await.context("while listing deployments")?;
        return output(json, &views, || views.iter().for_each(print_deployment));
    }

    if let Some(name) = cli_args.get("deployment") {
        if cli_args.contains_key("with-images") {
            let data = deployments
                .get_deployment_with_image_data(name)
                .await
                .with_context(|| format!("while resolving images of deployment {name}"))?;
            return output(json, &data, || print_deployment_with_images(&data));
        }
        let view = deployments
            .get(name)
            .await
            .with_context(|| format!("while fetching deployment {name}"))?;
        return output(json, &view, || print_deployment(&view));
    }

    if let Some(app) = cli_args.get("app") {
        let details = deployments
            .get_application_details(app)
            .await
            .with_context(|| format!("while building details of application {app}"))?;
        return output(json, &details, || print_application(app, &details));
    }

    if let Some(name) = cli_args.get("images") {
        let found = match cli_args.get("image-version") {
            Some(version) => vec![images
                .get_by_version(name, version)
                .await
                .with_context(|| format!("while fetching image {name}:{version}"))?],
            None => images
                .get(name)
                .await
                .with_context(|| format!("while fetching images of {name}"))?,
        };
        return output(json, &found, || found.iter().for_each(print_image));
    }

    if let Some(deployment) = cli_args.get("set") {
        let container = cli_args.get("container").ok_or_else(|| anyhow!("--set requires --container"))?;
        let image = cli_args.get("image").ok_or_else(|| anyhow!("--set requires --image"))?;
        let ack = deployments
            .set(deployment, container, image)
            .await
            .with_context(|| format!("while updating deployment {deployment}"))?;
        return output(json, &ack, || {
            println!("{} {}/{} -> {}", "updated".green(), deployment, container, image)
        });
    }

    Err(anyhow!("no command given\n\n{USAGE}"))
}

fn output<T: Serialize>(json: bool, value: &T, human: impl FnOnce()) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

fn print_deployment(deployment: &DeploymentView) {
    let app = deployment.application().unwrap_or("-");
    println!("{} ({})", deployment.name.bold(), app.cyan());
    for container in &deployment.containers {
        println!("  {:<20} {}", container.name, container.image);
    }
}

fn print_image(image: &EnhancedImage) {
    println!(
        "{:<40} {:<27} {}",
        image.name.bold(),
        image.created_at().to_string(),
        image.metadata.git_hub_base.dimmed()
    );
}

fn print_deployment_with_images(data: &DeploymentWithImageData) {
    print_deployment(&data.deployment);
    println!("running {}", data.deployment_app_image_name.green());
    for image in &data.deployment_images {
        let marker = if image.image.name == data.deployment_app_image_name { "*" } else { " " };
        println!("{} {:<40} {}", marker, image.deployment_image_name, image.age.dimmed());
    }
}

fn print_application(app: &str, details: &ApplicationDetails) {
    println!("{} {}", "application".bold(), app.cyan());
    for deployment in &details.deployments {
        print_deployment(deployment);
    }
    for (image_name, entries) in &details.image_lists {
        println!("{}", image_name.bold());
        for entry in entries {
            let running: Vec<_> = entry.deployments.iter().map(|d| d.name.as_str()).collect();
            println!("  {:<40} {:<27} {}", entry.image.name, entry.image.created_at().to_string(), running.join(", ").green());
        }
    }
}
