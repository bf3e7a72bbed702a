use clap::Parser;
use stacksmith::config::cli::USAGE;
use stacksmith::templates::LambdaFunctionTemplate;
use stacksmith::utils::logger;
use stacksmith::utils::validation::Validate;
use stacksmith::{AwsContext, CloudFormationChangeSets, RunnerArgs, Runner, S3ObjectStore};

#[tokio::main]
async fn main() {
    let args = RunnerArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else if let Err(e) = logger::init_cli_logger(args.verbose, args.log_file.as_deref()) {
        eprintln!("❌ Failed to open log file: {}", e);
        std::process::exit(1);
    }

    tracing::info!("🚀 Starting stacksmith runner");

    let request = args.change_request();

    // 驗證配置
    if let Err(e) = request.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let aws = AwsContext::load(args.region.as_deref()).await;
    let store = S3ObjectStore::new(aws.s3_client());
    let change_sets = CloudFormationChangeSets::new(aws.cloudformation_client());

    let runner = match Runner::new(request, store, change_sets, LambdaFunctionTemplate::default()) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    match runner.run().await {
        Ok(receipt) => {
            tracing::info!("✅ Change set created");
            println!("{}", receipt);
        }
        Err(e) => {
            tracing::error!(
                "❌ Deployment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code().max(1));
        }
    }
}
