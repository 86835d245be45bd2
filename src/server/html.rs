//! Server-rendered HTML pages. Every piece of catalog or user text goes
//! through [`escape`].

use crate::catalog_store::{format_timestamp, EmotionLogEntry, RecommendationRecord, Song};
use crate::emotion::Emotion;
use crate::recommendation::RecommendationOutcome;
use std::fmt::Write;

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body{{font-family:sans-serif;margin:2em}}table{{border-collapse:collapse}}\
         td,th{{border:1px solid #ccc;padding:4px 8px}}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n{body}\n<p><a href=\"/\">Back</a></p>\n</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}

fn song_row(out: &mut String, song: &Song, extra: Option<&str>) {
    let _ = write!(
        out,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
        escape(&song.name),
        escape(&song.artist),
        escape(&song.album),
        escape(&song.release_date)
    );
    if let Some(extra) = extra {
        let _ = write!(out, "<td>{}</td>", escape(extra));
    }
    out.push_str("</tr>\n");
}

pub fn recommendation_history(records: &[RecommendationRecord]) -> String {
    if records.is_empty() {
        return page(
            "Recommendation History",
            "<p>No songs have been recommended yet.</p>",
        );
    }
    let mut body = String::from(
        "<table>\n<tr><th>Name</th><th>Artist</th><th>Album</th><th>Release Date</th><th>Recommended At</th></tr>\n",
    );
    for record in records {
        song_row(
            &mut body,
            &record.song,
            Some(&format_timestamp(record.recommended_at)),
        );
    }
    body.push_str("</table>");
    page("Recommendation History", &body)
}

pub fn mood_playlists(playlists: &[(String, Vec<Song>)]) -> String {
    if playlists.is_empty() {
        return page("Mood Playlists", "<p>The catalog is empty.</p>");
    }
    let mut body = String::new();
    for (mood, songs) in playlists {
        let _ = write!(
            body,
            "<h2>{}</h2>\n<table>\n<tr><th>Name</th><th>Artist</th><th>Album</th><th>Release Date</th></tr>\n",
            escape(mood)
        );
        for song in songs {
            song_row(&mut body, song, None);
        }
        body.push_str("</table>\n");
    }
    page("Mood Playlists", &body)
}

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 360.0;
const CHART_MARGIN_LEFT: f64 = 90.0;
const CHART_MARGIN_RIGHT: f64 = 20.0;
const CHART_MARGIN_TOP: f64 = 20.0;
const CHART_MARGIN_BOTTOM: f64 = 60.0;
const CHART_X_LABELS: usize = 6;

/// Line chart of the emotion log: one point per entry in time order, one row
/// per emotion.
pub fn emotion_chart(entries: &[EmotionLogEntry]) -> String {
    let points: Vec<(usize, &EmotionLogEntry)> = entries
        .iter()
        .filter_map(|entry| {
            let emotion = entry.emotion.parse::<Emotion>().ok()?;
            let row = Emotion::ALL.iter().position(|e| *e == emotion)?;
            Some((row, entry))
        })
        .collect();

    if points.is_empty() {
        return page(
            "Emotion Chart",
            "<p>No emotions have been recorded yet. Start the camera to build your history.</p>",
        );
    }

    let plot_width = CHART_WIDTH - CHART_MARGIN_LEFT - CHART_MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - CHART_MARGIN_TOP - CHART_MARGIN_BOTTOM;
    let rows = Emotion::ALL.len() as f64;
    let x_of = |i: usize| {
        if points.len() == 1 {
            CHART_MARGIN_LEFT + plot_width / 2.0
        } else {
            CHART_MARGIN_LEFT + plot_width * i as f64 / (points.len() - 1) as f64
        }
    };
    let y_of = |row: usize| CHART_MARGIN_TOP + plot_height * (row as f64 + 0.5) / rows;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" role=\"img\">\n"
    );

    for (row, emotion) in Emotion::ALL.iter().enumerate() {
        let y = y_of(row);
        let _ = writeln!(
            svg,
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#eee\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"12\">{}</text>",
            CHART_MARGIN_LEFT,
            CHART_WIDTH - CHART_MARGIN_RIGHT,
            CHART_MARGIN_LEFT - 8.0,
            y + 4.0,
            emotion
        );
    }

    let polyline = points
        .iter()
        .enumerate()
        .map(|(i, (row, _))| format!("{:.1},{:.1}", x_of(i), y_of(*row)))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        svg,
        "<polyline fill=\"none\" stroke=\"#3b6ea5\" stroke-width=\"2\" points=\"{}\"/>",
        polyline
    );

    for (i, (row, entry)) in points.iter().enumerate() {
        let _ = writeln!(
            svg,
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"#3b6ea5\"><title>{} {}</title></circle>",
            x_of(i),
            y_of(*row),
            escape(&format_timestamp(entry.logged_at)),
            escape(&entry.emotion)
        );
    }

    let label_step = points.len().div_ceil(CHART_X_LABELS).max(1);
    let label_y = CHART_HEIGHT - CHART_MARGIN_BOTTOM + 20.0;
    for (i, (_, entry)) in points.iter().enumerate() {
        if i % label_step != 0 && i != points.len() - 1 {
            continue;
        }
        let _ = writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"10\">{}</text>",
            x_of(i),
            label_y,
            escape(&format_timestamp(entry.logged_at))
        );
    }
    svg.push_str("</svg>");

    let body = format!("<p>{} recorded emotions.</p>\n{}", points.len(), svg);
    page("Emotion Chart", &body)
}

pub fn alarm_result(outcome: Option<&RecommendationOutcome>) -> String {
    let body = match outcome {
        None => "<p>No alarm has gone off yet.</p>".to_string(),
        Some(RecommendationOutcome::Error { error }) => {
            format!("<p>The alarm went off, but no song could be found: {}</p>", escape(error))
        }
        Some(RecommendationOutcome::Song(song)) => format!(
            "<p>Wake up to <strong>{}</strong> by {}</p>\n\
             <p>Album: {} ({})</p>\n\
             <p><a href=\"{}\" target=\"_blank\">Watch on YouTube</a></p>",
            escape(&song.name),
            escape(&song.artist),
            escape(&song.album),
            escape(&song.release_date),
            escape(&song.youtube_link)
        ),
    };
    page("Alarm", &body)
}
