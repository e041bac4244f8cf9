use ladle::classifier::{FeatureMatrix, SgdClassifier, SgdConfig, TfIdfVectorizer};
use ladle::{read_records, Classifier, ClassifierError, ClassificationReport, DatasetError, RecordReader, RecordSet};
use std::fs;

#[test]
fn test_empty_training_set() {
    let result = Classifier::builder().fit(&RecordSet::default());
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_header_only_file_cannot_train() -> Result<(), Box<dyn std::error::Error>> {
    let records = RecordReader::new().read("soup,is_soup\n".as_bytes())?;
    assert!(records.is_empty());
    assert!(matches!(
        Classifier::builder().fit(&records),
        Err(ClassifierError::ValidationError(_))
    ));
    Ok(())
}

#[test]
fn test_label_row_mismatch() {
    let (_, matrix) = TfIdfVectorizer::fit_transform(&["gazpacho", "galoshes"]);
    let result = SgdClassifier::fit(&SgdConfig::default(), &matrix, &[true]);
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_zero_rows() {
    let matrix = FeatureMatrix::new(Vec::new(), 0);
    let result = SgdClassifier::fit(&SgdConfig::default(), &matrix, &[]);
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_matrix_narrower_than_its_rows() {
    let (_, matrix) = TfIdfVectorizer::fit_transform(&["gazpacho soup", "rubber galoshes"]);
    let narrowed = FeatureMatrix::new(matrix.rows().to_vec(), 1);
    assert!(narrowed.check_indices().is_err());

    let result = SgdClassifier::fit(&SgdConfig::default(), &narrowed, &[true, false]);
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_invalid_hyperparameters() {
    let records: RecordSet = vec![ladle::Record::new("pho", true)].into();
    for builder in [
        Classifier::builder().with_alpha(-1.0),
        Classifier::builder().with_alpha(f64::INFINITY),
        Classifier::builder().with_max_epochs(0),
        Classifier::builder().with_intercept_decay(-0.5),
    ] {
        assert!(matches!(
            builder.fit(&records),
            Err(ClassifierError::ValidationError(_))
        ));
    }
}

#[test]
fn test_short_row_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "soup,is_soup\nramen,TRUE\nudon\n").unwrap();

    match read_records(&path) {
        Err(DatasetError::Format { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("2 columns"));
        }
        other => panic!("expected a format error, got {:?}", other),
    }
}

#[test]
fn test_label_truthiness_is_strict() -> Result<(), Box<dyn std::error::Error>> {
    let csv = "soup,is_soup\na,TRUE\nb,true\nc,tRuE\nd,1\ne,yes\nf,T\ng,\n";
    let records = RecordReader::new().read(csv.as_bytes())?;
    assert_eq!(records.len(), 7);
    assert_eq!(records.labels(), vec![1, 1, 1, 0, 0, 0, 0]);
    Ok(())
}

#[test]
fn test_report_length_mismatch() {
    assert!(matches!(
        ClassificationReport::from_predictions(&[true, false], &[true]),
        Err(ClassifierError::ValidationError(_))
    ));
}

#[test]
fn test_zero_positive_support() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = Classifier::builder().fit(
        &RecordReader::new().read("soup,is_soup\nbouillabaisse,TRUE\nflip flops,FALSE\n".as_bytes())?,
    )?;
    let only_negatives = RecordReader::new().read("soup,is_soup\nflip flops,FALSE\nsandals,FALSE\n".as_bytes())?;

    let report = ladle::evaluate(&classifier, &only_negatives)?;
    assert_eq!(report.is_soup.support, 0);
    assert_eq!(report.is_soup.recall, 0.0);
    assert_eq!(report.is_not_soup.support, 2);
    Ok(())
}

#[test]
fn test_blank_line_is_format_error() {
    let err = RecordReader::new()
        .read("soup,is_soup\nramen,TRUE\n\nudon,FALSE\n".as_bytes())
        .unwrap_err();
    match err {
        DatasetError::Format { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other:?}"),
    }
}
