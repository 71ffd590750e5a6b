/// ALTERスクリプト生成のシナリオテスト
///
/// JSON形式のスキーマ差分を入力として、生成されるスクリプトの内容と順序、
/// DROP文の扱いを公開APIを通じて確認します。
use altergen::services::alter_script_generator::{AlterScriptGenerator, GenerationOptions};
use serde_json::json;

fn generate(delta: serde_json::Value) -> altergen::services::alter_script_generator::AlterScriptResult {
    AlterScriptGenerator::default()
        .generate_from_json(&delta.to_string())
        .unwrap()
}

fn generate_without_drops(
    delta: serde_json::Value,
) -> altergen::services::alter_script_generator::AlterScriptResult {
    AlterScriptGenerator::new(GenerationOptions {
        apply_drop_statements: false,
        ..GenerationOptions::default()
    })
    .generate_from_json(&delta.to_string())
    .unwrap()
}

fn modified_entity(old: serde_json::Value, new: serde_json::Value) -> serde_json::Value {
    json!({ "entities": { "modified": [{ "old": old, "new": new }] } })
}

fn executable_lines(script: &str) -> Vec<&str> {
    script
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with("-- "))
        .collect()
}

#[cfg(test)]
mod key_constraint_tests {
    use super::*;

    /// 同一の複合キー同士の比較では何も生成されないことを確認
    #[test]
    fn test_identical_composite_key_is_noop() {
        let table = json!({
            "name": "t",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "integer", "primaryKey": true, "compositePrimaryKey": true },
                { "GUID": "gb", "name": "b", "mode": "integer", "primaryKey": true, "compositePrimaryKey": true }
            ],
            "primaryKey": [{
                "id": "k1",
                "compositePrimaryKey": [{ "keyId": "ga" }, { "keyId": "gb" }],
                "indexTablespace": "fast"
            }]
        });

        let result = generate(modified_entity(table.clone(), table));

        assert_eq!(result.container_level_script, "");
        assert_eq!(result.entity_level_script, "");
        assert!(!result.does_container_level_alter_script_contain_drop_statements);
    }

    /// 単一カラムの複合主キーから、オプションなしの通常主キーへの変換はDDLを生成しないことを確認
    #[test]
    fn test_composite_to_regular_transition_is_noop() {
        let old = json!({
            "name": "t",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "integer", "primaryKey": true, "compositePrimaryKey": true },
                { "GUID": "gb", "name": "b", "mode": "integer" }
            ],
            "primaryKey": [{ "id": "k1", "compositePrimaryKey": [{ "keyId": "ga" }] }]
        });
        let new = json!({
            "name": "t",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "integer", "primaryKey": true },
                { "GUID": "gb", "name": "b", "mode": "integer" }
            ]
        });

        assert_eq!(generate(modified_entity(old.clone(), new.clone())).container_level_script, "");
        assert_eq!(generate(modified_entity(new, old)).container_level_script, "");
    }

    /// 複合主キーから名前付き通常主キーへの変換で、DROPがADDより前に出力されることを確認
    #[test]
    fn test_round_trip_to_named_regular_key() {
        let old = json!({
            "name": "T",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "int", "primaryKey": true, "compositePrimaryKey": true },
                { "GUID": "gb", "name": "b", "mode": "int" }
            ],
            "primaryKey": [{ "id": "k1", "compositePrimaryKey": [{ "keyId": "ga" }] }]
        });
        let new = json!({
            "name": "T",
            "columns": [
                {
                    "GUID": "ga", "name": "a", "mode": "int", "primaryKey": true,
                    "primaryKeyOptions": [{ "constraintName": "t_pk2" }]
                },
                { "GUID": "gb", "name": "b", "mode": "int" }
            ]
        });

        let result = generate(modified_entity(old, new));

        assert_eq!(
            result.entity_level_script,
            "ALTER TABLE IF EXISTS \"T\" DROP CONSTRAINT IF EXISTS \"T_pk\";\n\n\
             ALTER TABLE IF EXISTS \"T\" ADD CONSTRAINT t_pk2 PRIMARY KEY (a);"
        );
        assert!(result.does_entity_level_alter_script_contain_drop_statements);
    }

    /// 複合キーのカラム名変更ではカラムのリネームのみが生成されることを確認
    #[test]
    fn test_guid_stable_rename_only_renames_column() {
        let old = json!({
            "name": "t",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "integer", "unique": true, "compositeUniqueKey": true },
                { "GUID": "gb", "name": "b", "mode": "integer", "unique": true, "compositeUniqueKey": true }
            ],
            "uniqueKey": [{ "id": "u1", "compositeUniqueKey": [{ "keyId": "ga" }, { "keyId": "gb" }] }]
        });
        let mut new = old.clone();
        new["columns"][0]["name"] = json!("a_renamed");

        let result = generate(modified_entity(old, new));

        assert_eq!(
            result.container_level_script,
            "ALTER TABLE IF EXISTS t RENAME COLUMN a TO a_renamed;"
        );
    }

    /// キーオプションの変更でDROPがADDより前に並ぶことを確認
    #[test]
    fn test_option_change_orders_drop_before_add() {
        let old = json!({
            "name": "t",
            "columns": [{
                "GUID": "g1", "name": "id", "mode": "integer", "primaryKey": true,
                "primaryKeyOptions": [{ "constraintName": "t_pk" }]
            }]
        });
        let new = json!({
            "name": "t",
            "columns": [{
                "GUID": "g1", "name": "id", "mode": "integer", "primaryKey": true,
                "primaryKeyOptions": [{ "constraintName": "t_pk", "indexTablespace": "fast" }]
            }]
        });

        let script = generate(modified_entity(old, new)).container_level_script;
        let drop_index = script.find("DROP CONSTRAINT IF EXISTS t_pk").unwrap();
        let add_index = script.find("ADD CONSTRAINT t_pk PRIMARY KEY").unwrap();

        assert!(drop_index < add_index);
    }
}

#[cfg(test)]
mod cross_emitter_order_tests {
    use super::*;

    /// 主キーを追加カラムへ移すと、既存の主キーの削除がカラム追加より前に出力されることを確認
    #[test]
    fn test_primary_key_moved_to_added_column() {
        let old = json!({
            "name": "t",
            "columns": [{ "GUID": "ga", "name": "a", "mode": "integer", "primaryKey": true }]
        });
        let new = json!({
            "name": "t",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "integer" },
                { "GUID": "gc", "name": "c", "mode": "integer", "primaryKey": true }
            ]
        });

        let result = generate(modified_entity(old, new));

        assert_eq!(
            result.entity_level_script,
            "ALTER TABLE IF EXISTS t DROP CONSTRAINT IF EXISTS t_pk;\n\n\
             ALTER TABLE IF EXISTS t ADD COLUMN IF NOT EXISTS c integer PRIMARY KEY;"
        );
    }

    /// 主キーと必須指定を同時に外すと、主キーの削除がNOT NULL解除より前に出力されることを確認
    #[test]
    fn test_primary_key_removed_with_required_flag() {
        let old = json!({
            "name": "t",
            "columns": [{ "GUID": "ga", "name": "a", "mode": "integer", "primaryKey": true }],
            "required": ["a"]
        });
        let new = json!({
            "name": "t",
            "columns": [{ "GUID": "ga", "name": "a", "mode": "integer" }]
        });

        let result = generate(modified_entity(old, new));

        assert_eq!(
            result.entity_level_script,
            "ALTER TABLE IF EXISTS t DROP CONSTRAINT IF EXISTS t_pk;\n\n\
             ALTER TABLE IF EXISTS t ALTER COLUMN a DROP NOT NULL;"
        );
    }

    /// 複合キーのカラム削除と新しい複合キーの追加で、削除が追加より前に出力されることを確認
    #[test]
    fn test_composite_unique_key_rebuilt_around_dropped_column() {
        let old = json!({
            "name": "t",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "integer", "unique": true, "compositeUniqueKey": true },
                { "GUID": "gb", "name": "b", "mode": "integer", "unique": true, "compositeUniqueKey": true }
            ],
            "uniqueKey": [{ "id": "u1", "compositeUniqueKey": [{ "keyId": "ga" }, { "keyId": "gb" }] }]
        });
        let new = json!({
            "name": "t",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "integer", "unique": true, "compositeUniqueKey": true },
                { "GUID": "gc", "name": "c", "mode": "integer", "unique": true, "compositeUniqueKey": true }
            ],
            "uniqueKey": [{ "id": "u1", "compositeUniqueKey": [{ "keyId": "ga" }, { "keyId": "gc" }] }]
        });

        let lines = executable_lines(&generate(modified_entity(old, new)).entity_level_script)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        assert_eq!(
            lines,
            vec![
                "ALTER TABLE IF EXISTS t DROP CONSTRAINT IF EXISTS t_ukey;",
                "ALTER TABLE IF EXISTS t ADD COLUMN IF NOT EXISTS c integer;",
                "ALTER TABLE IF EXISTS t ADD CONSTRAINT t_ukey UNIQUE (a, c);",
                "ALTER TABLE IF EXISTS t DROP COLUMN IF EXISTS b;",
            ]
        );
    }

    /// 空の制約名と未指定の制約名は同じ複合キーとして扱われることを確認
    #[test]
    fn test_blank_constraint_name_is_not_a_change() {
        let old = json!({
            "name": "t",
            "columns": [
                { "GUID": "ga", "name": "a", "mode": "integer", "primaryKey": true, "compositePrimaryKey": true },
                { "GUID": "gb", "name": "b", "mode": "integer", "primaryKey": true, "compositePrimaryKey": true }
            ],
            "primaryKey": [{
                "id": "k1",
                "constraintName": "",
                "compositePrimaryKey": [{ "keyId": "ga" }, { "keyId": "gb" }]
            }]
        });
        let mut new = old.clone();
        new["primaryKey"][0]
            .as_object_mut()
            .unwrap()
            .remove("constraintName");

        let result = generate(modified_entity(old, new));

        assert_eq!(result.container_level_script, "");
    }
}

#[cfg(test)]
mod table_change_tests {
    use super::*;

    /// 式が変わったCHECK制約が削除・再作成されることを確認
    #[test]
    fn test_check_constraint_expression_change() {
        let old = json!({
            "name": "t",
            "columns": [{ "GUID": "g1", "name": "x", "mode": "integer" }],
            "chkConstr": [{ "chkConstrName": "chk1", "constrExpression": "x>0" }]
        });
        let new = json!({
            "name": "t",
            "columns": [{ "GUID": "g1", "name": "x", "mode": "integer" }],
            "chkConstr": [{ "chkConstrName": "chk1", "constrExpression": "x>=0" }]
        });

        let result = generate(modified_entity(old, new));

        assert_eq!(
            result.container_level_script,
            "ALTER TABLE IF EXISTS t DROP CONSTRAINT IF EXISTS chk1;\n\
             ALTER TABLE IF EXISTS t ADD CONSTRAINT chk1 CHECK (x>=0);"
        );
    }

    /// カラムコメントを空にするとNULLを設定するDROP系の文が1つ生成されることを確認
    #[test]
    fn test_cleared_column_comment() {
        let old = json!({
            "name": "t",
            "columns": [{ "GUID": "g1", "name": "c", "mode": "text", "description": "legacy" }]
        });
        let new = json!({
            "name": "t",
            "columns": [{ "GUID": "g1", "name": "c", "mode": "text", "description": "" }]
        });

        let result = generate(modified_entity(old.clone(), new.clone()));
        assert_eq!(result.container_level_script, "COMMENT ON COLUMN t.c IS NULL;");
        assert!(result.does_container_level_alter_script_contain_drop_statements);

        let result = generate_without_drops(modified_entity(old, new));
        assert_eq!(result.container_level_script, "-- COMMENT ON COLUMN t.c IS NULL;");
    }

    /// 同じ差分から常に同じスクリプトが生成されることを確認
    #[test]
    fn test_generation_is_deterministic() {
        let delta = json!({
            "containers": { "added": [{ "name": "sales" }] },
            "entities": {
                "added": [{ "name": "orders", "columns": [{ "GUID": "g1", "name": "id", "mode": "integer" }] }],
                "deleted": [{ "name": "legacy" }]
            }
        });

        assert_eq!(generate(delta.clone()), generate(delta));
    }
}

#[cfg(test)]
mod drop_handling_tests {
    use super::*;

    fn destructive_delta() -> serde_json::Value {
        json!({
            "containers": { "deleted": [{ "name": "archive" }] },
            "entities": {
                "deleted": [{ "name": "legacy" }],
                "modified": [{
                    "old": {
                        "name": "users",
                        "columns": [
                            { "GUID": "g1", "name": "id", "mode": "integer" },
                            { "GUID": "g2", "name": "age", "mode": "integer" }
                        ],
                        "required": ["id"]
                    },
                    "new": {
                        "name": "users",
                        "columns": [{ "GUID": "g1", "name": "id", "mode": "integer" }]
                    }
                }]
            },
            "relationships": {
                "deleted": [{
                    "name": "fk_orders_users",
                    "parent": { "table": "users", "columns": [{ "name": "id" }] },
                    "child": { "table": "orders", "columns": [{ "name": "user_id" }] }
                }]
            }
        })
    }

    /// DROP文を適用しない設定では、有効なDROP文が実行可能な形で現れないことを確認
    #[test]
    fn test_drop_suppression() {
        let result = generate_without_drops(destructive_delta());

        for script in [&result.entity_level_script, &result.container_level_script] {
            assert!(!script.is_empty());
            for line in executable_lines(script) {
                assert!(!line.contains("DROP"), "unexpected executable drop: {}", line);
            }
        }
        assert!(result.does_entity_level_alter_script_contain_drop_statements);
        assert!(result.does_container_level_alter_script_contain_drop_statements);
    }

    /// DROP文を適用する設定では、同じ文が実行可能な形で出力されることを確認
    #[test]
    fn test_drops_are_executable_when_applied() {
        let result = generate(destructive_delta());
        let lines = executable_lines(&result.container_level_script);

        assert_eq!(
            lines,
            vec![
                "ALTER TABLE IF EXISTS orders DROP CONSTRAINT IF EXISTS fk_orders_users;",
                "ALTER TABLE IF EXISTS users ALTER COLUMN id DROP NOT NULL;",
                "ALTER TABLE IF EXISTS users DROP COLUMN IF EXISTS age;",
                "DROP TABLE IF EXISTS legacy;",
                "DROP SCHEMA IF EXISTS archive;",
            ]
        );
    }

    /// 無効化されたオブジェクトの文は、設定にかかわらずコメントアウトされることを確認
    #[test]
    fn test_activation_suppression() {
        let delta = json!({
            "entities": {
                "added": [{
                    "name": "drafts",
                    "isActivated": false,
                    "columns": [{ "GUID": "g1", "name": "id", "mode": "integer" }]
                }],
                "deleted": [{ "name": "old_drafts", "isActivated": false }]
            }
        });

        for result in [generate(delta.clone()), generate_without_drops(delta.clone())] {
            assert!(executable_lines(&result.container_level_script).is_empty());
            assert!(result.container_level_script.contains("-- CREATE TABLE IF NOT EXISTS drafts ("));
            assert!(result.container_level_script.contains("-- DROP TABLE IF EXISTS old_drafts;"));
            assert!(!result.does_container_level_alter_script_contain_drop_statements);
        }
    }
}

#[cfg(test)]
mod input_error_tests {
    use super::*;

    /// 不正なJSONでは部分的なスクリプトを返さずエラーになることを確認
    #[test]
    fn test_malformed_delta_is_rejected() {
        let generator = AlterScriptGenerator::default();

        for input in ["", "{ \"entities\": ", "[]", "42", "{ \"entities\": { \"added\": [{}] } }"] {
            let error = generator.generate_from_json(input).unwrap_err();
            assert!(error.is_malformed_input(), "input: {}", input);
        }
    }

    /// 空の差分からは空のスクリプトが生成されることを確認
    #[test]
    fn test_empty_delta() {
        let result = generate(json!({}));

        assert_eq!(result.entity_level_script, "");
        assert_eq!(result.container_level_script, "");
        assert!(!result.does_entity_level_alter_script_contain_drop_statements);
    }
}
