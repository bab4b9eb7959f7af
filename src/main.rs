use attest_graph::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use attest_graph::cli::Args;
use attest_graph::config;
use attest_graph::prelude::*;
use attest_graph::shared::error::{AttestError, ExitCode};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            exit_code_for(&e)
        }
    };

    process::exit(exit_code.as_i32());
}

/// Invalid input gets its own exit code so CI can tell a bad invocation
/// from an operational failure.
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<AttestError>() {
        Some(AttestError::InvalidImageReference { .. }) | Some(AttestError::InvalidPlatform { .. }) => {
            ExitCode::InvalidArguments
        }
        _ => ExitCode::ApplicationError,
    }
}

async fn run() -> Result<ExitCode> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Load config: explicit path wins, otherwise auto-discover in the
    // working directory.
    let config_file = match &args.config {
        Some(path) => Some(config::load_config_from_path(Path::new(path))?),
        None => config::discover_config(Path::new("."))?,
    };
    let options = args.resolve(config_file.as_ref());

    // Create adapters (Dependency Injection)
    let cosign = CosignClient::new()
        .with_binary(&options.cosign_path)
        .with_timeout(options.timeout_seconds);
    let progress_reporter = StderrProgressReporter::new();

    if args.verify {
        return run_verify(&args, cosign, progress_reporter).await;
    }

    let vulnerability_provider = if options.check_cve {
        Some(OsvClient::new()?)
    } else {
        None
    };

    // Create use case with injected dependencies
    let use_case = BuildGraphUseCase::new(cosign, vulnerability_provider, progress_reporter);

    // Execute use case; validation of image and platform happens behind
    // the inbound port, before any external call.
    let request = AssessmentRequest::new(
        args.image.clone(),
        options.platform.clone(),
        options.check_cve,
    );
    let response = use_case.assess_image(request).await?;

    print_verdict(&response.assessment);

    // Display progress message and format the report
    eprintln!("{}", FormatterFactory::progress_message(options.format));
    let formatter = FormatterFactory::create(options.format);
    let formatted_output =
        formatter.format(&response.graph, &response.assessment, &response.metadata)?;

    // Present output
    let presenter = PresenterFactory::create(match args.output {
        Some(output_path) => PresenterType::File(PathBuf::from(output_path)),
        None => PresenterType::Stdout,
    });
    presenter.present(&formatted_output)?;

    Ok(if response.assessment.trust_level == TrustLevel::Untrusted {
        ExitCode::UntrustedImage
    } else {
        ExitCode::Success
    })
}

async fn run_verify(
    args: &Args,
    verifier: CosignClient,
    progress_reporter: StderrProgressReporter,
) -> Result<ExitCode> {
    let image = ImageReference::new(args.image.clone())?;
    let verify_options = VerifyOptions {
        predicate_kind: PredicateKind::Sbom,
        certificate_identity: args.certificate_identity.clone(),
        certificate_oidc_issuer: args.certificate_oidc_issuer.clone(),
    };

    let use_case = VerifyAttestationUseCase::new(verifier, progress_reporter);
    let outcome = use_case.execute(&image, &verify_options).await?;

    println!("{}", outcome.output);

    Ok(if outcome.success {
        ExitCode::Success
    } else {
        ExitCode::UntrustedImage
    })
}

/// One colored verdict line on stderr before the report itself.
fn print_verdict(assessment: &SecurityAssessment) {
    let trust = match assessment.trust_level {
        TrustLevel::Verified => format!("✅ {}", assessment.trust_level.label().green().bold()),
        TrustLevel::Partial => format!("⚠️  {}", assessment.trust_level.label().yellow().bold()),
        TrustLevel::Untrusted => format!("❌ {}", assessment.trust_level.label().red().bold()),
        TrustLevel::Unknown => format!("❓ {}", assessment.trust_level.label().dimmed()),
    };
    let risk = match assessment.risk_level {
        RiskLevel::Low => format!("{}", assessment.risk_level.label().green()),
        RiskLevel::Medium => format!("{}", assessment.risk_level.label().yellow()),
        RiskLevel::High | RiskLevel::Critical => {
            format!("{}", assessment.risk_level.label().red())
        }
    };

    eprintln!(
        "{} · {} · score {}/100",
        trust, risk, assessment.score
    );
}
