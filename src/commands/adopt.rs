use crate::adopt::{AlarmEngine, DescribeAlarmsFile, HandlebarsRenderer, IdentifierAllocator};
use crate::config::AdoptConfig;
use crate::context::Context;
use anyhow::{Context as AnyhowContext, Result};
use std::io::Write;
use std::sync::Arc;

/// Handles the 'tf', 'tfstate' and 'export' commands
pub struct AdoptCommand;

impl AdoptCommand {
    /// Print the rendered Terraform configuration
    pub fn execute_tf(ctx: &Context, config: &AdoptConfig, out: &mut dyn Write) -> Result<()> {
        let engine = Self::build_engine(ctx, config)?;
        let tf = engine.tf().context("Failed to generate Terraform configuration")?;

        out.write_all(tf.as_bytes())
            .context("Failed to write Terraform configuration")?;
        Ok(())
    }

    /// Print the state file
    pub fn execute_tfstate(
        ctx: &Context,
        config: &AdoptConfig,
        out: &mut dyn Write,
    ) -> Result<()> {
        let engine = Self::build_engine(ctx, config)?;
        let json = engine
            .tfstate_file()
            .context("Failed to generate state")?
            .to_json_pretty()
            .context("Failed to serialize state")?;

        writeln!(out, "{}", json).context("Failed to write state")?;
        Ok(())
    }

    /// Write both artifacts into the output directory
    pub fn execute_export(ctx: &Context, config: &AdoptConfig, force: bool) -> Result<()> {
        ctx.output.section("CloudWatch Alarm Adoption");

        let tf_path = config.tf_path();
        let tfstate_path = config.tfstate_path();

        if !force {
            for path in [&tf_path, &tfstate_path] {
                if ctx.fs.exists(path) {
                    anyhow::bail!(
                        "{} already exists. Use --force to overwrite it.",
                        path.display()
                    );
                }
            }
        }

        let engine = Self::build_engine(ctx, config)?;
        ctx.output
            .info(&format!("Reading alarms from {}", engine.source_description()));
        let output = engine.execute().context("Failed to adopt alarms")?;

        ctx.output.key_value("Alarms", &output.tfstate.len().to_string());
        if output.tfstate.is_empty() {
            ctx.output.warning("No metric alarms found, writing empty artifacts");
        }

        let state_json = crate::adopt::StateFile::new(output.tfstate)
            .to_json_pretty()
            .context("Failed to serialize state")?;

        let written = ctx
            .fs
            .create_dir_all(&config.output_dir)
            .and_then(|_| ctx.fs.write(&tf_path, &output.tf))
            .and_then(|_| ctx.fs.write(&tfstate_path, &format!("{}\n", state_json)));
        if let Err(e) = written {
            ctx.output.error("Failed to write artifacts");
            return Err(e);
        }

        ctx.output.success("Generated Terraform configuration");
        ctx.output.path(&tf_path.display().to_string());
        ctx.output.success("Generated state file");
        ctx.output.path(&tfstate_path.display().to_string());
        ctx.output.blank();
        ctx.output
            .dimmed("Run 'terraform plan' in the output directory; it should report no changes.");

        Ok(())
    }

    fn build_engine(ctx: &Context, config: &AdoptConfig) -> Result<AlarmEngine> {
        let input = config
            .input
            .as_ref()
            .context("No input given. Pass --input or set 'input' in the config file.")?;

        let source = DescribeAlarmsFile::new(Arc::clone(&ctx.fs), input.clone());
        let renderer = HandlebarsRenderer::new()?;
        let allocator = match config.seed {
            Some(seed) => {
                tracing::debug!("Using seeded identifiers (seed {})", seed);
                IdentifierAllocator::seeded(seed)
            }
            None => IdentifierAllocator::random(),
        };

        Ok(AlarmEngine::new(
            Box::new(source),
            Box::new(renderer),
            allocator,
        ))
    }
}
