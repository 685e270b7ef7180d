use oas3_client_gen::GenerationStats;

/// Prints `label value` rows under a status line, like a build summary.
pub(super) struct Report {
  quiet: bool,
  verbose: bool,
}

impl Report {
  pub(super) fn new(quiet: bool, verbose: bool) -> Self {
    Self { quiet, verbose }
  }

  pub(super) fn info(&self, message: &str) {
    if !self.quiet {
      println!("{message}");
    }
  }

  fn stat(&self, label: &str, value: impl std::fmt::Display) {
    if !self.quiet {
      println!("    {label:<24} {value}");
    }
  }

  pub(super) fn statistics(&self, stats: &GenerationStats) {
    if self.quiet {
      return;
    }

    self.stat("Types generated:", stats.types_generated);
    self.stat("", format!("{} structs", stats.structs_generated));
    self.stat("", format!("{} enums", stats.enums_generated));
    self.stat("", format!("{} unions", stats.unions_generated));
    self.stat("", format!("{} type aliases", stats.type_aliases_generated));
    self.stat("Operations converted:", stats.operations_converted);

    if stats.cycles_detected > 0 {
      self.stat("Cycles:", stats.cycles_detected);
      self.stat("Forward declarations:", stats.forward_declarations);
      if self.verbose {
        for (i, cycle) in stats.cycle_details.iter().enumerate() {
          println!("      Cycle {}: {}", i + 1, cycle.join(" -> "));
        }
      }
    }

    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len());
      for warning in &stats.warnings {
        eprintln!("Warning: {warning}");
      }
    }
  }
}
