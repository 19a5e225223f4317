//! Interactive selection of clusters, task definitions and containers.
//!
//! Anything the operator can pick implements [`Selectable`]; the prompt itself sits
//! behind [`Selector`] so the lookup flow can be driven without a terminal.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use std::io::{BufRead, Write};

use crate::app::error::ViewerError;

/// An item that can be shown in a selection prompt
pub trait Selectable {
    fn label(&self) -> String;
}

/// Picks one of several labels
pub trait Selector {
    /// Return the index of the chosen label
    fn select_index(&mut self, labels: &[String], prompt: &str) -> Result<usize>;
}

/// Let the operator pick one item through `selector`
pub fn select_item<'a, T, S>(selector: &mut S, items: &'a [T], prompt: &str) -> Result<&'a T>
where
    T: Selectable,
    S: Selector + ?Sized,
{
    let labels: Vec<String> = items.iter().map(Selectable::label).collect();
    let index = selector.select_index(&labels, prompt)?;
    items
        .get(index)
        .ok_or_else(|| anyhow::anyhow!("selected index {} out of range", index))
}

/// Indices of the labels matching `term`, best match first
pub fn rank_labels(matcher: &SkimMatcherV2, labels: &[String], term: &str) -> Vec<usize> {
    let mut scored: Vec<(usize, i64)> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            matcher
                .fuzzy_match(label, term)
                .map(|score| (index, score))
        })
        .collect();

    // Stable: equal scores keep list order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(index, _)| index).collect()
}

/// Line-based prompt: lists the candidates by number and reads either a number or a
/// fuzzy search term. A search that leaves one candidate selects it.
pub struct TerminalSelector<R, W> {
    input: R,
    output: W,
    matcher: SkimMatcherV2,
}

impl TerminalSelector<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr so stdout stays free for results
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            matcher: SkimMatcherV2::default(),
        }
    }

    fn show(&mut self, labels: &[String], candidates: &[usize], prompt: &str) -> Result<()> {
        for (position, &index) in candidates.iter().enumerate() {
            writeln!(self.output, "  {:>3}) {}", position + 1, labels[index])?;
        }
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Selector for TerminalSelector<R, W> {
    fn select_index(&mut self, labels: &[String], prompt: &str) -> Result<usize> {
        if labels.is_empty() {
            return Err(ViewerError::SelectionAborted(prompt.trim().to_string()).into());
        }

        let mut candidates: Vec<usize> = (0..labels.len()).collect();
        loop {
            self.show(labels, &candidates, prompt)?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("Failed to read selection")?;
            if read == 0 {
                return Err(ViewerError::SelectionAborted(prompt.trim().to_string()).into());
            }

            let answer = line.trim();
            if answer.is_empty() {
                candidates = (0..labels.len()).collect();
                continue;
            }

            if let Ok(position) = answer.parse::<usize>() {
                if let Some(&index) = position.checked_sub(1).and_then(|p| candidates.get(p)) {
                    return Ok(index);
                }
            }

            let matches = rank_labels(&self.matcher, labels, answer);
            match matches.len() {
                0 => {
                    writeln!(self.output, "No match for {:?}", answer)?;
                    candidates = (0..labels.len()).collect();
                }
                1 => return Ok(matches[0]),
                _ => candidates = matches,
            }
        }
    }
}
