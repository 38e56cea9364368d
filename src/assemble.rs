// Plot assembly: role assignment, header defaults, shared limits

use crate::coerce::{coerce, coerce_all, present, Series};
use crate::command::PlotCommand;
use crate::config::{Params, SeriesFormat};
use crate::error::PlotError;
use crate::ir::{CallData, PlotKind, RenderCall};
use crate::normalize::RawSeries;
use crate::scale::Extent;
use crate::tally::tally;

/// Everything needed to plan one document
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub command: PlotCommand,
    pub series: Vec<RawSeries>,
    pub headers: Option<Vec<String>>,
    pub params: Params,
    pub count: bool,
    pub fmt: SeriesFormat,
}

/// Build the render plan for a request.
///
/// The request's params are never modified; each call carries its own
/// derived copy.
pub fn assemble(request: &PlotRequest) -> Result<Vec<RenderCall>, PlotError> {
    if request.series.is_empty() {
        return Err(PlotError::EmptyDocument);
    }

    let labels = HeaderLabels(request.headers.as_deref());
    let params = request.params.clone();

    match request.command {
        PlotCommand::Histogram => histogram(&request.series, labels, params),
        PlotCommand::Bar => bar(request.command, &request.series, labels, params, request.count),
        PlotCommand::Count => bar(request.command, &request.series, labels, params, true),
        PlotCommand::Line => line(&request.series, labels, params),
        PlotCommand::Lines => overlaid(PlotKind::Line, request, labels, params),
        PlotCommand::Scatter => overlaid(PlotKind::Scatter, request, labels, params),
        PlotCommand::Density => overlaid(PlotKind::Density, request, labels, params),
        PlotCommand::Boxplot => boxplot(&request.series, labels, params),
    }
}

/// Header lookup that treats absent and empty labels alike
#[derive(Clone, Copy)]
struct HeaderLabels<'a>(Option<&'a [String]>);

impl<'a> HeaderLabels<'a> {
    fn get(self, index: usize) -> Option<&'a str> {
        self.0
            .and_then(|h| h.get(index))
            .map(String::as_str)
            .filter(|label| !label.is_empty())
    }

    fn owned(self, index: usize) -> Option<String> {
        self.get(index).map(str::to_string)
    }
}

/// Set `slot` from a header only when the user left it unset
fn default_from(slot: &mut Option<String>, label: Option<&str>) {
    if slot.is_none() {
        *slot = label.map(str::to_string);
    }
}

fn default_limits(slot: &mut Option<(f64, f64)>, extent: Option<Extent>) {
    if slot.is_none() {
        *slot = extent.map(Extent::as_tuple);
    }
}

fn require(command: PlotCommand, series: &[RawSeries], needed: usize) -> Result<(), PlotError> {
    if series.len() < needed {
        return Err(PlotError::usage(format!(
            "{} needs at least {} series, but the input has {}",
            command,
            needed,
            series.len()
        )));
    }
    Ok(())
}

fn histogram(series: &[RawSeries], labels: HeaderLabels, mut params: Params) -> Result<Vec<RenderCall>, PlotError> {
    require(PlotCommand::Histogram, series, 1)?;
    let values = present(&coerce(&series[0], 0)?);
    default_from(&mut params.title, labels.get(0));
    Ok(vec![RenderCall::primary(
        PlotKind::Histogram,
        CallData::Values { values },
        params,
    )])
}

fn bar(
    command: PlotCommand,
    series: &[RawSeries],
    labels: HeaderLabels,
    mut params: Params,
    counting: bool,
) -> Result<Vec<RenderCall>, PlotError> {
    let (bar_labels, values): (Vec<String>, Vec<f64>) = if counting {
        require(command, series, 1)?;
        let t = tally(&series[0]);
        let counts: Vec<f64> = t.counts.into_iter().map(|c| c as f64).collect();
        (t.categories, counts)
    } else {
        require(command, series, 2)?;
        let values = coerce(&series[1], 1)?;
        series[0]
            .iter()
            .zip(values)
            .filter_map(|(label, value)| Some((label.clone().unwrap_or_default(), value?)))
            .unzip()
    };

    let title = if counting {
        labels.get(1).or(labels.get(0))
    } else {
        labels.get(1)
    };
    default_from(&mut params.title, title);

    Ok(vec![RenderCall::primary(
        PlotKind::Bar,
        CallData::Bars {
            labels: bar_labels,
            values,
        },
        params,
    )])
}

fn line(series: &[RawSeries], labels: HeaderLabels, mut params: Params) -> Result<Vec<RenderCall>, PlotError> {
    require(PlotCommand::Line, series, 1)?;

    let (x, y) = if series.len() == 1 {
        let y = coerce(&series[0], 0)?;
        let x: Series = (1..=y.len()).map(|i| Some(i as f64)).collect();
        default_from(&mut params.ylabel, labels.get(0));
        (x, y)
    } else {
        if series.len() > 2 {
            log::debug!(
                "lineplot uses the first two series; ignoring {} more",
                series.len() - 2
            );
        }
        default_from(&mut params.xlabel, labels.get(0));
        default_from(&mut params.ylabel, labels.get(1));
        (coerce(&series[0], 0)?, coerce(&series[1], 1)?)
    };

    Ok(vec![RenderCall::primary(
        PlotKind::Line,
        CallData::Xy { x, y },
        params,
    )])
}

/// Lines, scatter and density: one primary call plus an overlay per extra
/// y series, all on a shared scale.
fn overlaid(
    kind: PlotKind,
    request: &PlotRequest,
    labels: HeaderLabels,
    mut params: Params,
) -> Result<Vec<RenderCall>, PlotError> {
    require(request.command, &request.series, 2)?;
    let series = coerce_all(&request.series)?;

    match request.fmt {
        SeriesFormat::Xyy => {
            default_limits(
                &mut params.ylim,
                Extent::of_all(series[1..].iter().map(Vec::as_slice)),
            );
            default_from(&mut params.xlabel, labels.get(0));
            default_from(&mut params.name, labels.get(1));

            let x = &series[0];
            let mut calls = vec![RenderCall::primary(
                kind,
                CallData::Xy {
                    x: x.clone(),
                    y: series[1].clone(),
                },
                params,
            )];
            for (i, y) in series.iter().enumerate().skip(2) {
                calls.push(RenderCall::overlay(
                    kind,
                    CallData::Xy {
                        x: x.clone(),
                        y: y.clone(),
                    },
                    labels.owned(i),
                ));
            }
            Ok(calls)
        }
        SeriesFormat::Xyxy => {
            if series.len() % 2 != 0 {
                return Err(PlotError::usage(format!(
                    "{} with --fmt xyxy needs x,y series pairs, but the input has {} series",
                    request.command,
                    series.len()
                )));
            }
            default_limits(
                &mut params.xlim,
                Extent::of_all(series.iter().step_by(2).map(Vec::as_slice)),
            );
            default_limits(
                &mut params.ylim,
                Extent::of_all(series.iter().skip(1).step_by(2).map(Vec::as_slice)),
            );
            default_from(&mut params.name, labels.get(1));

            let mut pairs = series.chunks_exact(2).enumerate();
            let mut calls = Vec::with_capacity(series.len() / 2);
            if let Some((_, pair)) = pairs.next() {
                calls.push(RenderCall::primary(
                    kind,
                    CallData::Xy {
                        x: pair[0].clone(),
                        y: pair[1].clone(),
                    },
                    params,
                ));
            }
            for (k, pair) in pairs {
                calls.push(RenderCall::overlay(
                    kind,
                    CallData::Xy {
                        x: pair[0].clone(),
                        y: pair[1].clone(),
                    },
                    labels.owned(2 * k + 1),
                ));
            }
            Ok(calls)
        }
    }
}

fn boxplot(series: &[RawSeries], labels: HeaderLabels, params: Params) -> Result<Vec<RenderCall>, PlotError> {
    require(PlotCommand::Boxplot, series, 1)?;

    let mut calls = Vec::with_capacity(series.len());
    let mut params = Some(params);
    for (i, raw) in series.iter().enumerate() {
        let data = CallData::Distribution {
            label: labels.owned(i).unwrap_or_else(|| (i + 1).to_string()),
            values: present(&coerce(raw, i)?),
        };
        calls.push(match params.take() {
            Some(p) => RenderCall::primary(PlotKind::Boxplot, data, p),
            None => RenderCall::overlay(PlotKind::Boxplot, data, None),
        });
    }
    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Role;
    use crate::normalize::{normalize, Orientation};
    use crate::table::parse_table;

    fn raw(values: &[&str]) -> RawSeries {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    fn request(command: PlotCommand, series: Vec<RawSeries>, headers: Option<Vec<&str>>) -> PlotRequest {
        PlotRequest {
            command,
            series,
            headers: headers.map(|h| h.into_iter().map(str::to_string).collect()),
            params: Params::default(),
            count: false,
            fmt: SeriesFormat::Xyy,
        }
    }

    fn xy(call: &RenderCall) -> (&Series, &Series) {
        match &call.data {
            CallData::Xy { x, y } => (x, y),
            other => panic!("expected xy data, got {:?}", other),
        }
    }

    fn nums(values: &[f64]) -> Series {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_line_scenario_with_headers() {
        let table = parse_table("x\ty\n1\t2\n2\t4\n3\t9\n", b'\t').unwrap();
        let n = normalize(table, true, Orientation::ColumnMajor);
        let req = PlotRequest {
            command: PlotCommand::Line,
            series: n.series,
            headers: n.headers,
            params: Params::default(),
            count: false,
            fmt: SeriesFormat::Xyy,
        };
        let calls = assemble(&req).unwrap();
        assert_eq!(calls.len(), 1);
        let (x, y) = xy(&calls[0]);
        assert_eq!(x, &nums(&[1.0, 2.0, 3.0]));
        assert_eq!(y, &nums(&[2.0, 4.0, 9.0]));
        assert_eq!(calls[0].params.xlabel.as_deref(), Some("x"));
        assert_eq!(calls[0].params.ylabel.as_deref(), Some("y"));
    }

    #[test]
    fn test_line_single_series_implicit_x() {
        let req = request(PlotCommand::Line, vec![raw(&["5", "6", "7"])], Some(vec!["v"]));
        let calls = assemble(&req).unwrap();
        let (x, y) = xy(&calls[0]);
        assert_eq!(x, &nums(&[1.0, 2.0, 3.0]));
        assert_eq!(y, &nums(&[5.0, 6.0, 7.0]));
        assert_eq!(calls[0].params.ylabel.as_deref(), Some("v"));
        assert_eq!(calls[0].params.xlabel, None);
    }

    #[test]
    fn test_count_scenario() {
        let table = parse_table("1\n2\n1\n3\n1\n", b'\t').unwrap();
        let n = normalize(table, false, Orientation::ColumnMajor);
        let req = request(PlotCommand::Count, n.series, None);
        let calls = assemble(&req).unwrap();
        assert_eq!(
            calls[0].data,
            CallData::Bars {
                labels: vec!["1".into(), "2".into(), "3".into()],
                values: vec![3.0, 1.0, 1.0],
            }
        );
    }

    #[test]
    fn test_bar_flag_counts() {
        let mut req = request(PlotCommand::Bar, vec![raw(&["a", "b", "a"])], Some(vec!["fruit"]));
        req.count = true;
        let calls = assemble(&req).unwrap();
        assert!(matches!(&calls[0].data, CallData::Bars { values, .. } if values == &vec![2.0, 1.0]));
        assert_eq!(calls[0].params.title.as_deref(), Some("fruit"));
    }

    #[test]
    fn test_bar_labels_and_title() {
        let req = request(
            PlotCommand::Bar,
            vec![raw(&["a", "b"]), raw(&["1.5", "2"])],
            Some(vec!["name", "score"]),
        );
        let calls = assemble(&req).unwrap();
        assert_eq!(
            calls[0].data,
            CallData::Bars {
                labels: vec!["a".into(), "b".into()],
                values: vec![1.5, 2.0],
            }
        );
        assert_eq!(calls[0].params.title.as_deref(), Some("score"));
    }

    #[test]
    fn test_bar_drops_missing_values() {
        let req = request(
            PlotCommand::Bar,
            vec![raw(&["a", "b", "c"]), vec![Some("1".into()), None, Some("3".into())]],
            None,
        );
        let calls = assemble(&req).unwrap();
        assert!(matches!(&calls[0].data, CallData::Bars { labels, .. } if labels == &vec!["a".to_string(), "c".to_string()]));
    }

    #[test]
    fn test_bar_needs_two_series() {
        let req = request(PlotCommand::Bar, vec![raw(&["1"])], None);
        let err = assemble(&req).unwrap_err();
        assert!(matches!(err, PlotError::Usage(_)));
        assert!(err.to_string().contains("at least 2 series"));
    }

    #[test]
    fn test_histogram_title_and_missing() {
        let req = request(
            PlotCommand::Histogram,
            vec![vec![Some("1".into()), None, Some("2".into())]],
            Some(vec!["latency"]),
        );
        let calls = assemble(&req).unwrap();
        assert_eq!(calls[0].data, CallData::Values { values: vec![1.0, 2.0] });
        assert_eq!(calls[0].params.title.as_deref(), Some("latency"));
    }

    #[test]
    fn test_explicit_title_not_overridden() {
        for command in [PlotCommand::Histogram, PlotCommand::Bar, PlotCommand::Count] {
            let mut req = request(command, vec![raw(&["1", "2"]), raw(&["3", "4"])], Some(vec!["a", "b"]));
            req.params.title = Some("mine".to_string());
            let calls = assemble(&req).unwrap();
            assert_eq!(calls[0].params.title.as_deref(), Some("mine"));
        }
    }

    #[test]
    fn test_explicit_labels_and_name_not_overridden() {
        let mut req = request(PlotCommand::Line, vec![raw(&["1", "2"]), raw(&["3", "4"])], Some(vec!["a", "b"]));
        req.params.xlabel = Some("my x".to_string());
        req.params.ylabel = Some("my y".to_string());
        let calls = assemble(&req).unwrap();
        assert_eq!(calls[0].params.xlabel.as_deref(), Some("my x"));
        assert_eq!(calls[0].params.ylabel.as_deref(), Some("my y"));

        let mut req = request(PlotCommand::Line, vec![raw(&["1", "2"])], Some(vec!["a"]));
        req.params.ylabel = Some("my y".to_string());
        let calls = assemble(&req).unwrap();
        assert_eq!(calls[0].params.ylabel.as_deref(), Some("my y"));

        let mut req = request(
            PlotCommand::Lines,
            vec![raw(&["1", "2"]), raw(&["0", "5"]), raw(&["-3", "2"])],
            Some(vec!["t", "y1", "y2"]),
        );
        req.params.xlabel = Some("my x".to_string());
        req.params.name = Some("mine".to_string());
        let calls = assemble(&req).unwrap();
        assert_eq!(calls[0].params.xlabel.as_deref(), Some("my x"));
        assert_eq!(calls[0].params.name.as_deref(), Some("mine"));
        assert_eq!(calls[1].params.name.as_deref(), Some("y2"));
    }

    #[test]
    fn test_request_params_untouched() {
        let req = request(PlotCommand::Line, vec![raw(&["1"]), raw(&["2"])], Some(vec!["a", "b"]));
        assemble(&req).unwrap();
        assert_eq!(req.params, Params::default());
    }

    #[test]
    fn test_lines_shared_ylim_and_overlays() {
        let req = request(
            PlotCommand::Lines,
            vec![raw(&["1", "2"]), raw(&["0", "5"]), raw(&["-3", "2"])],
            Some(vec!["t", "y1", "y2"]),
        );
        let calls = assemble(&req).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].role, Role::Primary);
        assert_eq!(calls[0].params.ylim, Some((-3.0, 5.0)));
        assert_eq!(calls[0].params.name.as_deref(), Some("y1"));
        assert_eq!(calls[0].params.xlabel.as_deref(), Some("t"));
        assert_eq!(calls[1].role, Role::Overlay);
        assert_eq!(calls[1].params.name.as_deref(), Some("y2"));
        let (x, y) = xy(&calls[1]);
        assert_eq!(x, &nums(&[1.0, 2.0]));
        assert_eq!(y, &nums(&[-3.0, 2.0]));
    }

    #[test]
    fn test_scatter_keeps_user_ylim() {
        let mut req = request(
            PlotCommand::Scatter,
            vec![raw(&["1", "2"]), raw(&["0", "5"]), raw(&["-3", "2"])],
            None,
        );
        req.params.ylim = Some((0.0, 1.0));
        let calls = assemble(&req).unwrap();
        assert_eq!(calls[0].params.ylim, Some((0.0, 1.0)));
        assert_eq!(calls[1].params.name, None);
    }

    #[test]
    fn test_density_ylim_ignores_missing() {
        let req = request(
            PlotCommand::Density,
            vec![raw(&["1", "2", "3"]), vec![Some("4".into()), None, Some("-1".into())]],
            None,
        );
        let calls = assemble(&req).unwrap();
        assert_eq!(calls[0].params.ylim, Some((-1.0, 4.0)));
    }

    #[test]
    fn test_lines_need_two_series() {
        let req = request(PlotCommand::Lines, vec![raw(&["1"])], None);
        assert!(matches!(assemble(&req), Err(PlotError::Usage(_))));
    }

    #[test]
    fn test_xyxy_pairs() {
        let mut req = request(
            PlotCommand::Scatter,
            vec![raw(&["0", "1"]), raw(&["10", "11"]), raw(&["5", "6"]), raw(&["-1", "0"])],
            Some(vec!["x1", "a", "x2", "b"]),
        );
        req.fmt = SeriesFormat::Xyxy;
        let calls = assemble(&req).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].params.xlim, Some((0.0, 6.0)));
        assert_eq!(calls[0].params.ylim, Some((-1.0, 11.0)));
        assert_eq!(calls[0].params.name.as_deref(), Some("a"));
        assert_eq!(calls[1].params.name.as_deref(), Some("b"));
        let (x, _) = xy(&calls[1]);
        assert_eq!(x, &nums(&[5.0, 6.0]));
    }

    #[test]
    fn test_xyxy_rejects_odd_series() {
        let mut req = request(
            PlotCommand::Lines,
            vec![raw(&["0"]), raw(&["1"]), raw(&["2"])],
            None,
        );
        req.fmt = SeriesFormat::Xyxy;
        let err = assemble(&req).unwrap_err();
        assert!(err.to_string().contains("pairs"));
    }

    #[test]
    fn test_boxplot_ordinal_labels() {
        let req = request(PlotCommand::Boxplot, vec![raw(&["1", "2"]), raw(&["3"])], None);
        let calls = assemble(&req).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].role, Role::Primary);
        assert_eq!(
            calls[1].data,
            CallData::Distribution {
                label: "2".into(),
                values: vec![3.0]
            }
        );
    }

    #[test]
    fn test_boxplot_header_labels() {
        let req = request(
            PlotCommand::Boxplot,
            vec![raw(&["1"]), raw(&["2"])],
            Some(vec!["before", ""]),
        );
        let calls = assemble(&req).unwrap();
        assert!(matches!(&calls[0].data, CallData::Distribution { label, .. } if label == "before"));
        assert!(matches!(&calls[1].data, CallData::Distribution { label, .. } if label == "2"));
    }

    #[test]
    fn test_coercion_error_propagates() {
        let req = request(PlotCommand::Line, vec![raw(&["1"]), raw(&["oops"])], None);
        assert!(matches!(
            assemble(&req),
            Err(PlotError::Coercion { series: 2, position: 1, .. })
        ));
    }

    #[test]
    fn test_empty_series_set() {
        let req = request(PlotCommand::Histogram, Vec::new(), None);
        assert_eq!(assemble(&req), Err(PlotError::EmptyDocument));
    }
}
