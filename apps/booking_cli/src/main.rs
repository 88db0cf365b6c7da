use anyhow::{Context, Result};
use booking_client::{
    config::load_settings, controls::SelectSnapshot, BookingFormController, FormControls, Outcome,
};
use chrono::NaiveDate;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Walk the specialty → doctor → date cascade against a booking server.
#[derive(Parser, Debug)]
struct Args {
    /// Overrides `server_url` from booking.toml / BOOKING_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    specialty: String,
    #[arg(long)]
    doctor: Option<String>,
    /// Appointment date, YYYY-MM-DD.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = Some(url);
    }
    if let Some(ms) = args.timeout_ms {
        settings.request_timeout_ms = ms;
    }

    let service = settings
        .build_service()
        .context("failed to set up booking service")?;
    let (controls, memory) = FormControls::in_memory();
    let controller =
        BookingFormController::new(service, controls, settings.controller_options());

    controller
        .on_specialty_change(&args.specialty)
        .await
        .with_context(|| format!("failed to load doctors for specialty {}", args.specialty))?;
    println!("Doctors for specialty {}:", args.specialty);
    print!("{}", render_options(&memory.doctor.snapshot()));

    let Some(doctor) = args.doctor else {
        if args.date.is_some() {
            warn!("--date ignored without --doctor");
        }
        return Ok(());
    };
    controller.on_doctor_change(&doctor).await?;

    let Some(date) = args.date else {
        return Ok(());
    };
    let date = date.format("%Y-%m-%d").to_string();
    match controller
        .on_date_change(&date)
        .await
        .with_context(|| format!("failed to load slots for doctor {doctor} on {date}"))?
    {
        Outcome::Populated { .. } => {
            println!("Slots for doctor {doctor} on {date}:");
            print!("{}", render_options(&memory.time.snapshot()));
        }
        other => println!("Slot lookup not performed: {other:?}"),
    }

    Ok(())
}

fn render_options(snapshot: &SelectSnapshot) -> String {
    let mut out = String::new();
    for option in &snapshot.options {
        let marker = if option.disabled { " (unavailable)" } else { "" };
        let value = if option.value.is_empty() {
            "-"
        } else {
            option.value.as_str()
        };
        out.push_str(&format!("  {value}\t{}{marker}\n", option.label));
    }
    out
}
