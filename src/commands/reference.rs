//! `taskboard statuses`, `skills` and `developers` commands.

use super::query_client;
use crate::context::ServiceContext;
use crate::model::Developer;
use crate::services::DeveloperService;
use crate::view::format_skills;

/// Execute the `statuses` command.
///
/// # Errors
///
/// Returns an error string if statuses cannot be loaded.
pub async fn statuses(ctx: &ServiceContext) -> Result<String, String> {
    let query = query_client(ctx).statuses().await;
    if let Some(error) = query.error {
        return Err(error);
    }
    let rows: Vec<Vec<String>> =
        query.data.into_iter().map(|s| vec![s.status_id.to_string(), s.status_name]).collect();
    Ok(table(&["ID", "STATUS"], &rows, "statuses"))
}

/// Execute the `skills` command.
///
/// # Errors
///
/// Returns an error string if skills cannot be loaded.
pub async fn skills(ctx: &ServiceContext) -> Result<String, String> {
    let query = query_client(ctx).skills().await;
    if let Some(error) = query.error {
        return Err(error);
    }
    let rows: Vec<Vec<String>> =
        query.data.into_iter().map(|s| vec![s.skill_id.to_string(), s.skill_name]).collect();
    Ok(table(&["ID", "SKILL"], &rows, "skills"))
}

/// Execute the `developers` command. With skill ids, the backend filters
/// to developers having those skills.
///
/// # Errors
///
/// Returns an error string if developers cannot be loaded.
pub async fn developers(ctx: &ServiceContext, skill_ids: &[u32]) -> Result<String, String> {
    let developers: Vec<Developer> = if skill_ids.is_empty() {
        let query = query_client(ctx).developers().await;
        if let Some(error) = query.error {
            return Err(error);
        }
        query.data
    } else {
        DeveloperService::new(ctx.http.clone()).get_developers(skill_ids).await.map_err(|e| e.to_string())?
    };
    let rows: Vec<Vec<String>> = developers
        .into_iter()
        .map(|d| {
            let skills = format_skills(d.skills.as_deref().unwrap_or_default());
            vec![d.developer_id, d.developer_name, skills]
        })
        .collect();
    Ok(table(&["ID", "NAME", "SKILLS"], &rows, "developers"))
}

/// Left-aligned columns sized to their widest cell, with a total line.
fn table(headers: &[&str], rows: &[Vec<String>], plural: &str) -> String {
    if rows.is_empty() {
        return format!("No {plural} found.");
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| rows.iter().map(|row| row[i].len()).max().unwrap_or(0).max(header.len()))
        .collect();
    let line = |cells: &[&str]| -> String {
        let padded: Vec<String> =
            cells.iter().zip(&widths).map(|(cell, width)| format!("{cell:<width$}")).collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = vec![line(headers)];
    out.push(widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>().join("  "));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(line(&cells));
    }
    out.push(format!("\n{} {plural} total.", rows.len()));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ok, server_error, Backend};
    use serde_json::json;

    #[tokio::test]
    async fn statuses_render_as_table() {
        let backend = Backend::new(vec![ok(json!([
            {"statusId": 1, "statusName": "Open"},
            {"statusId": 12, "statusName": "In progress"}
        ]))]);
        let out = statuses(&backend.ctx).await.unwrap();
        assert_eq!(
            out,
            "ID  STATUS\n--  -----------\n1   Open\n12  In progress\n\n2 statuses total."
        );
    }

    #[tokio::test]
    async fn developer_filter_goes_to_backend() {
        let backend = Backend::new(vec![ok(json!([
            {"developerId": "d-1", "developerName": "Ada", "skills": [{"skillId": 1, "skillName": "Rust"}]}
        ]))]);
        let out = developers(&backend.ctx, &[1, 3]).await.unwrap();
        assert!(out.contains("Ada"));
        assert!(out.contains("Rust"));
        assert_eq!(
            backend.requests()[0],
            json!({"method": "GET", "path": "/developers", "params": [["skill", "1,3"]]})
        );
    }

    #[tokio::test]
    async fn empty_skill_list() {
        let backend = Backend::new(vec![ok(json!([]))]);
        assert_eq!(skills(&backend.ctx).await.unwrap(), "No skills found.");
    }

    #[tokio::test]
    async fn failed_read_is_an_error() {
        let backend = Backend::new(vec![server_error()]);
        assert_eq!(skills(&backend.ctx).await.unwrap_err(), "500 Internal Server Error");
    }
}
