//! Scaler + multinomial logistic regression, fitted with full-batch gradient
//! descent, plus seeded k-fold cross-validation.

use crate::core::dataset::Sample;
use crate::domain::model::{FeatureFrame, Species, FEATURE_NAMES};
use crate::domain::ports::Classifier;
use crate::utils::error::{Result, ServiceError};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2_penalty: f64,
    pub folds: usize,
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            epochs: 500,
            l2_penalty: 1e-3,
            folds: 5,
            seed: 42,
        }
    }
}

/// Per-column standardisation using population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_features = rows.first().map(Vec::len).unwrap_or(0);
        let n = rows.len().max(1) as f64;

        let mean: Vec<f64> = (0..n_features)
            .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n)
            .collect();

        let scale = (0..n_features)
            .map(|j| {
                let var = rows.iter().map(|r| (r[j] - mean[j]).powi(2)).sum::<f64>() / n;
                let std = var.sqrt();
                if std > 0.0 {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Self { mean, scale }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight vector per class.
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}

impl LogisticModel {
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, params: &TrainingParams) -> Self {
        let n_features = x.first().map(Vec::len).unwrap_or(0);
        let n = x.len().max(1) as f64;
        let mut model = Self {
            weights: vec![vec![0.0; n_features]; n_classes],
            intercepts: vec![0.0; n_classes],
        };

        for _ in 0..params.epochs {
            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];

            for (row, &label) in x.iter().zip(y) {
                let probs = model.probabilities(row);
                for k in 0..n_classes {
                    let diff = probs[k] - if k == label { 1.0 } else { 0.0 };
                    for j in 0..n_features {
                        grad_w[k][j] += diff * row[j];
                    }
                    grad_b[k] += diff;
                }
            }

            for k in 0..n_classes {
                for j in 0..n_features {
                    let g = grad_w[k][j] / n + params.l2_penalty * model.weights[k][j];
                    model.weights[k][j] -= params.learning_rate * g;
                }
                model.intercepts[k] -= params.learning_rate * grad_b[k] / n;
            }
        }

        model
    }

    pub fn probabilities(&self, row: &[f64]) -> Vec<f64> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(row).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect();
        softmax(&logits)
    }

    pub fn predict_index(&self, row: &[f64]) -> usize {
        self.probabilities(row)
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
            .0
    }
}

/// The persisted artifact: scaler, weights and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub format_version: u32,
    pub trained_at: DateTime<Utc>,
    pub feature_names: Vec<String>,
    pub classes: Vec<Species>,
    pub scaler: StandardScaler,
    pub model: LogisticModel,
    pub n_samples: usize,
    pub cv_accuracy: Option<f64>,
}

impl TrainedModel {
    /// `None` when the winning index has no class, which only a malformed
    /// artifact can produce.
    pub fn predict_row(&self, row: &[f64]) -> Option<Species> {
        let scaled = self.scaler.transform(row);
        self.classes.get(self.model.predict_index(&scaled)).copied()
    }

    pub fn accuracy(&self, samples: &[Sample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let correct = samples
            .iter()
            .filter(|s| self.predict_row(&s.features) == Some(s.species))
            .count();
        correct as f64 / samples.len() as f64
    }
}

impl Classifier for TrainedModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, frame: &FeatureFrame) -> std::result::Result<Vec<Species>, String> {
        let rows = frame.select(&self.feature_names).ok_or_else(|| {
            format!(
                "model expects columns {:?}, got {:?}",
                self.feature_names,
                frame.columns()
            )
        })?;
        rows.iter()
            .map(|row| {
                self.predict_row(row).ok_or_else(|| {
                    format!("model has no class for its output among {} classes", self.classes.len())
                })
            })
            .collect()
    }
}

/// Fits on every sample, without cross-validation.
pub fn fit_model(samples: &[Sample], params: &TrainingParams) -> Result<TrainedModel> {
    if samples.is_empty() {
        return Err(ServiceError::TrainingError {
            message: "cannot fit a model on zero samples".to_string(),
        });
    }

    let rows: Vec<Vec<f64>> = samples.iter().map(|s| s.features.clone()).collect();
    let labels: Vec<usize> = samples.iter().map(|s| s.species.index()).collect();

    let scaler = StandardScaler::fit(&rows);
    let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();
    let model = LogisticModel::fit(&scaled, &labels, Species::ALL.len(), params);

    Ok(TrainedModel {
        format_version: MODEL_FORMAT_VERSION,
        trained_at: Utc::now(),
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        classes: Species::ALL.to_vec(),
        scaler,
        model,
        n_samples: samples.len(),
        cv_accuracy: None,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidation {
    pub fold_accuracies: Vec<f64>,
    pub mean_accuracy: f64,
}

pub fn cross_validate(samples: &[Sample], params: &TrainingParams) -> Result<CrossValidation> {
    let folds = params.folds;
    if folds < 2 || folds > samples.len() {
        return Err(ServiceError::TrainingError {
            message: format!(
                "cross-validation needs 2 <= folds <= samples, got {} folds for {} samples",
                folds,
                samples.len()
            ),
        });
    }

    let mut indices: Vec<usize> = (0..samples.len()).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(params.seed));

    let mut fold_accuracies = Vec::with_capacity(folds);
    for fold in 0..folds {
        let (test, train): (Vec<_>, Vec<_>) = indices
            .iter()
            .enumerate()
            .partition(|(position, _)| position % folds == fold);

        let train: Vec<Sample> = train.into_iter().map(|(_, &i)| samples[i].clone()).collect();
        let test: Vec<Sample> = test.into_iter().map(|(_, &i)| samples[i].clone()).collect();

        let model = fit_model(&train, params)?;
        let accuracy = model.accuracy(&test);
        tracing::debug!("fold {}/{}: accuracy {:.3}", fold + 1, folds, accuracy);
        fold_accuracies.push(accuracy);
    }

    let mean_accuracy = fold_accuracies.iter().sum::<f64>() / folds as f64;
    Ok(CrossValidation {
        fold_accuracies,
        mean_accuracy,
    })
}

/// Cross-validates, then fits the final model on all samples.
pub fn train(samples: &[Sample], params: &TrainingParams) -> Result<TrainedModel> {
    let cv = cross_validate(samples, params)?;
    tracing::info!(
        "Cross-validation accuracy: {:.3} over {} folds",
        cv.mean_accuracy,
        params.folds
    );

    let mut model = fit_model(samples, params)?;
    model.cv_accuracy = Some(cv.mean_accuracy);
    tracing::info!("Fitted model on {} samples", model.n_samples);
    Ok(model)
}
