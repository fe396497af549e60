/*!

This is the long-form manual for `tracker_core` and `subtrack`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, with a header row
* `excel` Excel workbooks (`.xlsx`, `.xls`)
* `pdf` tables printed in PDF reports

When the format is not given, it is guessed from the extension of the file.

### `csv`

The first line is the header. The columns can be in any order and can carry any of the
names used by the usual exports (see [Columns](#columns)).

```text
Number,Title,Status,Ball In Court,Created At
S-001,Rebar shop drawings,Open,Trent Eklund,2025-01-01
```

### `excel`

The first row of the worksheet is the header. By default the first worksheet is read,
another one can be selected with `excelWorksheetName` (or `--excel-worksheet-name`).
Whole numbers are read without decimals and date cells are read as `YYYY-MM-DD`.

### `pdf`

The text of each page is split in lines, and each line in cells on tabs or on runs of
two spaces or more. The first line with several cells is the header. On the following
pages, the lines repeating the header are skipped. A file without any such line is an
error.

This format requires the `pdf` feature, which is enabled by default.

## Columns

Headers are compared after trimming and lowercasing. The main canonical columns are:

| Column          | Submittals | RFIs | Default when absent |
|-----------------|------------|------|---------------------|
| `Submittal #`   | x          |      | empty               |
| `RFI #`         |            | x    | empty               |
| `Title`         | x          |      | empty               |
| `Subject`       |            | x    | empty               |
| `Spec Section`  | x          |      | empty               |
| `Discipline`    |            | x    | `General`           |
| `Contractor`    | x          | x    | derived, or `Unknown` |
| `Status`        | x          | x    | `Open`              |
| `Priority`      |            | x    | `Medium`            |
| `Ball in Court` | x          | x    | `Unknown`           |
| `Reviewer`      | x          |      | empty               |
| `Cost Impact`   |            | x    | `None`              |
| `Schedule Impact` |          | x    | `No`                |
| `Days Open`     | x          | x    | computed            |
| `Is Overdue`    | x          | x    | computed            |

When two source columns correspond to the same canonical column, only the first one is
renamed. The renamings are listed in the summary under `substitutions`.

Dates are read in the ISO format (`2025-01-31`, with or without a time), in the US format
(`01/31/2025`, `1/31/25`) and in a few textual formats (`31-Jan-2025`, `Jan 31, 2025`).
Anything else is treated as a missing date.

## Statuses

Each distinct status is either open or closed. Well-known statuses (`Approved`, `Closed`,
`Void`, `Open`, `Pending Review`, ...) are classified directly. For the other ones, a status
is closed when more than 70% of the items carrying it have a closing date, and open
otherwise. Without a closing date column, unknown statuses are open.

## Overdue items

An open item is overdue when the source marks it as such (an `Overdue` column holding `yes`,
`true`, `1`, `y` or `overdue`), when it has been open for more days than the threshold of its
kind, or when its due date has passed.

## Configuration

`subtrack` accepts a configuration file in JSON:

```json
{
  "outputSettings": {
    "projectName": "North Tower",
    "outputDirectory": "reports",
    "reportDate": "2025-03-01"
  },
  "fileSources": [
    { "kind": "submittal", "filePath": "submittals.csv" },
    { "kind": "rfi", "filePath": "rfis.xlsx", "provider": "excel", "excelWorksheetName": "RFIs" }
  ],
  "thresholds": { "submittalDays": 14, "rfiDays": 10 },
  "filters": { "contractors": ["CRB"], "disciplines": [] },
  "organizations": { "Zed Quill": "Quill Mechanical" }
}
```

The paths are relative to the directory of the configuration file. The flags of the command
line take precedence over the values of the file.

The `organizations` entries are added to the built-in directory of people, and replace the
built-in entries with the same name.

 */
