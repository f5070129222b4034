//! Standalone HTML documents for the external chart and graph renderers.
//!
//! Graphs are drawn by vis-network and charts by Plotly, both loaded from
//! their CDNs; this module only serializes the data and options they need.

use super::charts::{BarChart, DateHistogram};
use super::graph::NetworkGraph;
use super::markup::{escape_html, script_safe_json};
use super::palette::GraphLayout;
use serde_json::{json, Map, Value};

const VIS_NETWORK_SRC: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";
const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const GRAPH_BACKGROUND: &str = "#31333f";
const GRAPH_FONT_COLOR: &str = "white";
const GRAPH_HEIGHT: &str = "750px";

pub fn graph_document(graph: &NetworkGraph, layout: GraphLayout) -> Result<String, serde_json::Error> {
    let nodes: Vec<Value> = graph
        .nodes()
        .iter()
        .map(|node| {
            let mut value = json!({
                "id": node.id,
                "label": node.label,
                "size": node.size,
                "value": node.weight,
                "color": node.color,
                "borderWidth": node.border_width,
                "font": { "color": GRAPH_FONT_COLOR },
            });
            if let Some(title) = &node.title {
                value["title"] = Value::String(title.clone());
            }
            value
        })
        .collect();

    let edges: Vec<Value> = graph
        .edges()
        .iter()
        .map(|edge| {
            json!({
                "from": edge.source,
                "to": edge.target,
                "color": edge.color,
            })
        })
        .collect();

    let physics = layout.physics();
    let mut physics_options = Map::new();
    physics_options.insert("enabled".to_string(), Value::Bool(true));
    physics_options.insert("solver".to_string(), Value::from(physics.solver));
    physics_options.insert(physics.solver.to_string(), serde_json::to_value(&physics)?);
    let options = json!({
        "physics": physics_options,
        "interaction": { "hover": true },
    });

    let title = escape_html(graph.kind.title());
    let nodes = script_safe_json(&serde_json::to_string(&nodes)?);
    let edges = script_safe_json(&serde_json::to_string(&edges)?);
    let options = script_safe_json(&serde_json::to_string(&options)?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{VIS_NETWORK_SRC}"></script>
<style>
body {{ margin: 0; background-color: {GRAPH_BACKGROUND}; }}
#network {{ width: 100%; height: {GRAPH_HEIGHT}; background-color: {GRAPH_BACKGROUND}; }}
</style>
</head>
<body>
<div id="network"></div>
<script>
var nodes = new vis.DataSet({nodes});
var edges = new vis.DataSet({edges});
new vis.Network(document.getElementById("network"), {{ nodes: nodes, edges: edges }}, {options});
</script>
</body>
</html>
"#
    ))
}

pub fn bar_chart_document(chart: &BarChart) -> Result<String, serde_json::Error> {
    let names: Vec<&str> = chart.bars.iter().map(|bar| bar.name.as_str()).collect();
    let counts: Vec<usize> = chart.bars.iter().map(|bar| bar.count).collect();

    let data = json!([{
        "type": "bar",
        "orientation": "h",
        "x": counts,
        "y": names,
        "marker": {
            "color": counts,
            "colorscale": chart.palette.colorscale(),
            "showscale": true,
        },
    }]);
    let layout = json!({
        "title": chart.title,
        "xaxis": { "title": "count" },
        "yaxis": { "title": chart.dimension.label(), "categoryorder": "total ascending" },
    });

    plotly_document(chart.title, &data, &layout)
}

pub fn histogram_document(histogram: &DateHistogram) -> Result<String, serde_json::Error> {
    let mut years: Vec<i32> = histogram
        .bins
        .iter()
        .flat_map(|bin| bin.by_year.iter().map(|entry| entry.year))
        .collect();
    years.sort_unstable();
    years.dedup();

    let labels: Vec<String> = histogram
        .bins
        .iter()
        .map(|bin| format!("{} – {}", bin.start, bin.end))
        .collect();

    let data: Vec<Value> = years
        .iter()
        .enumerate()
        .map(|(series, year)| {
            let counts: Vec<usize> = histogram
                .bins
                .iter()
                .map(|bin| {
                    bin.by_year
                        .iter()
                        .find(|entry| entry.year == *year)
                        .map(|entry| entry.count)
                        .unwrap_or(0)
                })
                .collect();
            json!({
                "type": "bar",
                "orientation": "h",
                "name": year.to_string(),
                "x": counts,
                "y": labels,
                "marker": { "color": histogram.palette.series_color(series) },
            })
        })
        .collect();

    let layout = json!({
        "title": histogram.title,
        "barmode": "stack",
        "bargap": 0.1,
        "xaxis": { "title": "count" },
        "yaxis": { "title": "connected_on" },
    });

    plotly_document(histogram.title, &Value::Array(data), &layout)
}

fn plotly_document(title: &str, data: &Value, layout: &Value) -> Result<String, serde_json::Error> {
    let title = escape_html(title);
    let data = script_safe_json(&serde_json::to_string(data)?);
    let layout = script_safe_json(&serde_json::to_string(layout)?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_SRC}"></script>
</head>
<body>
<div id="chart"></div>
<script>
Plotly.newPlot("chart", {data}, {layout});
</script>
</body>
</html>
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::network::aggregate::{FrequencyTable, YearCount};
    use crate::workflows::network::charts::HistogramBin;
    use chrono::NaiveDate;
    use crate::workflows::network::graph::{GraphKind, GraphNode, NodeKind};
    use crate::workflows::network::palette::GradientPalette;

    fn sample_graph() -> NetworkGraph {
        let mut graph = NetworkGraph::with_root(GraphKind::Company, "Ada");
        graph.add_node(GraphNode {
            id: "company:</script>".to_string(),
            label: "</script>".to_string(),
            kind: NodeKind::Company,
            size: 15,
            weight: 3,
            color: "#10EDF5",
            border_width: 4,
            title: Some("<b>Acme</b> – 3<ul></ul>".to_string()),
        });
        graph.connect_root("company:</script>");
        graph
    }

    #[test]
    fn graph_document_embeds_data_and_layout_physics() {
        let html = graph_document(&sample_graph(), GraphLayout::Spoked).expect("renders");
        assert!(html.contains("vis-network"));
        assert!(html.contains("#31333f"));
        assert!(html.contains(r#""solver":"repulsion""#));
        assert!(html.contains(r#""springLength":200"#));
        assert!(html.contains(r#""color":"grey""#));
        assert!(html.contains("<title>Connections by Company Graph</title>"));
        // only the template's own script tags survive
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn packed_layout_uses_hierarchical_repulsion() {
        let html = graph_document(&sample_graph(), GraphLayout::Packed).expect("renders");
        assert!(html.contains(r#""solver":"hierarchicalRepulsion""#));
        assert!(html.contains(r#""hierarchicalRepulsion":{"#));
    }

    #[test]
    fn bar_chart_document_sorts_categories_ascending() {
        let table = FrequencyTable::tally(["Acme", "Acme", "Beta"]);
        let chart = BarChart::top_companies(&table, GradientPalette::Inferno);
        let html = bar_chart_document(&chart).expect("renders");
        assert!(html.contains("plotly"));
        assert!(html.contains(r#""categoryorder":"total ascending""#));
        assert!(html.contains(r##""colorscale":[[0.0,"#000004"],"##));
        assert!(html.contains(r##"[1.0,"#fcffa4"]"##));
    }

    #[test]
    fn histogram_document_colors_each_year_from_the_palette() {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        let histogram = DateHistogram {
            title: "Connections by Date",
            palette: GradientPalette::Magenta,
            bins: vec![
                HistogramBin {
                    start: ymd(2020, 1, 1),
                    end: ymd(2021, 1, 1),
                    total: 2,
                    by_year: vec![YearCount { year: 2020, count: 2 }],
                },
                HistogramBin {
                    start: ymd(2021, 1, 1),
                    end: ymd(2021, 6, 1),
                    total: 1,
                    by_year: vec![YearCount { year: 2021, count: 1 }],
                },
            ],
            undated: 0,
        };

        let html = histogram_document(&histogram).expect("renders");
        assert!(html.contains(r#""barmode":"stack""#));
        assert!(html.contains(r#""name":"2020""#));
        assert!(html.contains(r#""name":"2021""#));
        assert!(html.contains(r#""x":[2,0]"#));
        assert!(html.contains(r#""x":[0,1]"#));
        let first = GradientPalette::Magenta.series_color(0);
        let second = GradientPalette::Magenta.series_color(1);
        assert!(html.contains(&format!(r#""marker":{{"color":"{first}"}}"#)));
        assert!(html.contains(&format!(r#""marker":{{"color":"{second}"}}"#)));
        assert!(html.contains("2020-01-01 – 2021-01-01"));
        assert!(!html.contains("sequential"));
    }
}
