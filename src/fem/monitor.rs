use super::StepReport;
use crate::base::Config;

/// Prints the progress of the analysis stages, timesteps, and convergence
#[derive(Clone, Copy, Debug)]
pub struct Monitor {
    /// Verbose mode for stages
    pub verbose_stages: bool,

    /// Verbose mode during timesteps
    pub verbose_timesteps: bool,

    /// Verbose mode during iterations
    pub verbose_iterations: bool,
}

impl Monitor {
    /// Allocates a new instance using the verbose flags of a configuration
    pub fn new(config: &Config) -> Self {
        Monitor {
            verbose_stages: config.verbose_stages,
            verbose_timesteps: config.verbose_timesteps,
            verbose_iterations: config.verbose_iterations,
        }
    }

    /// Allocates a new instance that prints nothing
    pub fn quiet() -> Self {
        Monitor {
            verbose_stages: false,
            verbose_timesteps: false,
            verbose_iterations: false,
        }
    }

    /// Prints the name of an analysis stage
    pub fn print_stage(&self, name: &str, n_steps: usize, dt: f64) {
        if self.verbose_stages {
            println!("\nLIQSIM === {} ({} steps, Δt = {:e}) ", name, n_steps, dt);
        }
    }

    /// Prints the Rayleigh damping coefficients
    pub fn print_damping(&self, a0: f64, a1: f64) {
        if self.verbose_stages {
            println!("damping coefficients: a_0 = {:e}; a_1 = {:e}", a0, a1);
        }
    }

    /// Prints the header before the timestep table
    pub fn print_header(&self) {
        if self.verbose_timesteps || self.verbose_iterations {
            println!("Legend:");
            println!("✅ : converged");
            println!("🥵 : not converged");
            println!("😱 : found NaN or Inf\n");
            println!("{}", "─".repeat(56));
            println!("{:>8} {:>13} {:>13} {:>5} {:>11}  ", "timestep", "t", "Δt", "iter", "‖mdu‖∞");
            println!("{}", "─".repeat(56));
        }
    }

    /// Prints timestep data
    #[inline]
    #[rustfmt::skip]
    pub fn print_timestep(&self, timestep: usize, t: f64, dt: f64) {
        if !self.verbose_timesteps {
            return ;
        }
        println!(
            "{:>8} {:>13.6e} {:>13.6e} {:>5} {:>11}  ",
            timestep+1, t, dt, ".", "."
        );
    }

    /// Prints convergence data of a step
    #[inline]
    pub fn print_iterations(&self, report: &StepReport) {
        if !self.verbose_iterations {
            return;
        }
        let icon = if !report.norm_mdu.is_finite() {
            "😱"
        } else if report.converged {
            "✅"
        } else {
            "🥵"
        };
        println!(
            "{:>8} {:>13} {:>13} {:>5} {:>9.2e}{}",
            ".", ".", ".", report.iterations, report.norm_mdu, icon
        );
    }

    /// Prints the horizontal line at the end of the timestep table
    pub fn print_footer(&self) {
        if self.verbose_timesteps || self.verbose_iterations {
            println!("{}", "─".repeat(56));
        }
    }

    /// Prints a message about a failed step
    pub fn print_failure(&self, t: f64, dt: f64) {
        if self.verbose_stages {
            println!("🥵 analysis failed to converge at t = {:e} (Δt = {:e})", t, dt);
        }
    }

    /// Prints a message about a retry with a smaller timestep
    pub fn print_retry(&self, halving: usize, dt: f64, n_steps: usize) {
        if self.verbose_stages {
            println!("🔁 retry #{} with Δt = {:e} and {} steps", halving, dt, n_steps);
        }
    }

    /// Prints the final message of a stage
    pub fn print_done(&self, t: f64, success: bool) {
        if self.verbose_stages {
            if success {
                println!("✅ done (t = {:e})", t);
            } else {
                println!("😱 incomplete (t = {:e})", t);
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
