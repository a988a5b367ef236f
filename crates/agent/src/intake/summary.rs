//! Confirmation summary renderer

use nextcrm_config::SummaryTemplate;

use super::fields::FieldSet;

/// Render the confirmation block; only call this once the policy is satisfied
pub fn render_summary(fields: &FieldSet, template: &SummaryTemplate) -> String {
    let mut lines = vec![
        template.rule.clone(),
        template.title.clone(),
        template.rule.clone(),
    ];
    // iter() yields filled fields only, in dictionary order
    lines.extend(
        fields
            .iter()
            .map(|(key, value)| format!("{}{}{}", key.label(), template.separator, value)),
    );
    lines.push(template.rule.clone());
    lines.push(template.footer.clone());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::fields::FieldKey;

    #[test]
    fn test_omits_empty_fields() {
        let fields = FieldSet::from_pairs([("name", "张三"), ("company", "ABC"), ("phone", "")]);
        let summary = render_summary(&fields, &SummaryTemplate::default());

        assert!(summary.contains("姓名：张三"));
        assert!(summary.contains("公司：ABC"));
        assert!(!summary.contains("电话"));

        let name_at = summary.find("姓名").unwrap();
        let company_at = summary.find("公司").unwrap();
        assert!(name_at < company_at);
    }

    #[test]
    fn test_layout() {
        let template = SummaryTemplate::default();
        let fields = FieldSet::new()
            .with(FieldKey::Notes, "老客户介绍")
            .with(FieldKey::Name, "张三")
            .with(FieldKey::Company, "ABC公司")
            .with(FieldKey::WechatId, "zs_wx");
        let summary = render_summary(&fields, &template);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], template.rule);
        assert_eq!(lines[1], "📋 客户信息确认");
        assert_eq!(lines[2], template.rule);
        assert_eq!(
            &lines[3..7],
            &["姓名：张三", "公司：ABC公司", "微信号：zs_wx", "备注：老客户介绍"]
        );
        assert_eq!(lines[7], template.rule);
        assert_eq!(lines[8], template.footer);
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_custom_separator() {
        let template = SummaryTemplate {
            separator: ": ".to_string(),
            ..SummaryTemplate::default()
        };
        let fields = FieldSet::new().with(FieldKey::Email, "a@b.com");
        assert!(render_summary(&fields, &template).contains("邮箱: a@b.com"));
    }
}
