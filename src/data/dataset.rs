use crate::error::{NetError, Result};

/// One training example.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

/// An ordered, shape-checked list of samples.
///
/// Every input has `input_size` entries and every target `output_size`
/// entries; the only way to build one is through [`Dataset::new`] or
/// [`Dataset::from_samples`], which enforce that.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
    input_size: usize,
    output_size: usize,
}

impl Dataset {
    /// Pairs `inputs[i]` with `targets[i]`. Sizes are taken from the first pair.
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Dataset> {
        if inputs.len() != targets.len() {
            return Err(NetError::mismatch("target count", inputs.len(), targets.len()));
        }
        let samples = inputs.into_iter().zip(targets)
            .map(|(input, target)| Sample { input, target })
            .collect();
        Dataset::from_samples(samples)
    }

    pub fn from_samples(samples: Vec<Sample>) -> Result<Dataset> {
        let first = samples.first()
            .ok_or_else(|| NetError::Config("dataset has no samples".into()))?;
        let input_size = first.input.len();
        let output_size = first.target.len();

        for sample in &samples {
            if sample.input.len() != input_size {
                return Err(NetError::mismatch("input", input_size, sample.input.len()));
            }
            if sample.target.len() != output_size {
                return Err(NetError::mismatch("target", output_size, sample.target.len()));
            }
        }

        Ok(Dataset { samples, input_size, output_size })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

// ---------------------------------------------------------------------------
// Built-in toy datasets
// ---------------------------------------------------------------------------

/// Two samples mapping each input to itself: `[0,0] → [0,0]`, `[1,1] → [1,1]`.
pub fn builtin_identity() -> Dataset {
    Dataset {
        samples: vec![
            Sample { input: vec![0.0, 0.0], target: vec![0.0, 0.0] },
            Sample { input: vec![1.0, 1.0], target: vec![1.0, 1.0] },
        ],
        input_size: 2,
        output_size: 2,
    }
}

/// XOR with a one-hot target of length 2 (`[1,0]` for 0, `[0,1]` for 1).
pub fn builtin_xor() -> Dataset {
    let rows = [
        ([0.0, 0.0], [1.0, 0.0]),
        ([0.0, 1.0], [0.0, 1.0]),
        ([1.0, 0.0], [0.0, 1.0]),
        ([1.0, 1.0], [1.0, 0.0]),
    ];
    Dataset {
        samples: rows.iter()
            .map(|(input, target)| Sample { input: input.to_vec(), target: target.to_vec() })
            .collect(),
        input_size: 2,
        output_size: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pairs_inputs_with_targets() {
        let ds = Dataset::new(vec![vec![1.0], vec![2.0]], vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.input_size(), 1);
        assert_eq!(ds.output_size(), 2);
        assert_eq!(ds.samples()[1].input, vec![2.0]);
    }

    #[test]
    fn unequal_counts_are_rejected() {
        let err = Dataset::new(vec![vec![1.0]], vec![]).unwrap_err();
        assert!(matches!(err, NetError::DimensionMismatch { .. }));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Dataset::new(vec![vec![1.0, 2.0], vec![1.0]], vec![vec![0.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, NetError::DimensionMismatch { what: "input", expected: 2, received: 1 }));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(Dataset::new(vec![], vec![]).is_err());
    }

    #[test]
    fn builtins_are_well_formed() {
        for ds in [builtin_identity(), builtin_xor()] {
            let rebuilt = Dataset::from_samples(ds.samples().to_vec()).unwrap();
            assert_eq!(rebuilt, ds);
        }
    }
}
